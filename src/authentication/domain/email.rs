use semval::prelude::*;

/// The administrator's login address.
#[derive(Debug, Eq, PartialEq)]
pub struct Email(String);

impl Email {
    /// Wrap an address without validating it. Surrounding whitespace is
    /// dropped.
    pub fn unvalidated(address: String) -> Self {
        Self(address.trim().to_owned())
    }

    pub fn address(&self) -> &str {
        &self.0
    }

    /// Compare against a stored address, ignoring case.
    pub fn matches(&self, address: &str) -> bool {
        self.0.eq_ignore_ascii_case(address.trim())
    }

    fn domain(&self) -> Option<&str> {
        self.0.split_once('@').map(|(_, domain)| domain)
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum EmailInvalidity {
    /// Nothing follows the `@`.
    MissingDomain,
    /// There is no `@` at all.
    MissingSeparator,
}

impl Validate for Email {
    type Invalidity = EmailInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let domain = self.domain();

        ValidationContext::new()
            .invalidate_if(domain.is_none(), EmailInvalidity::MissingSeparator)
            .invalidate_if(
                matches!(domain, Some(domain) if domain.is_empty()),
                EmailInvalidity::MissingDomain,
            )
            .into()
    }
}

impl ValidatedFrom<&str> for Email {
    fn validated_from(from: &str) -> ValidatedResult<Self> {
        let into = Self::unvalidated(from.to_owned());

        match into.validate() {
            Ok(()) => Ok(into),
            Err(context) => Err((into, context)),
        }
    }
}
