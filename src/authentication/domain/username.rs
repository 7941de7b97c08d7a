use semval::prelude::*;

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 20;

/// The login name of the sales counter.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Username(String);

impl Username {
    pub fn unvalidated(username: String) -> Self {
        Self(username)
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    /// Usernames are compared case-insensitively, ignoring surrounding
    /// whitespace.
    pub fn matches(&self, other: &str) -> bool {
        self.0.trim().eq_ignore_ascii_case(other.trim())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UsernameInvalidity {
    MinLength(usize),
    MaxLength(usize),
    /// Only ASCII letters, digits and underscores are allowed.
    InvalidCharacters,
}

impl Validate for Username {
    type Invalidity = UsernameInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let length = self.0.chars().count();

        ValidationContext::new()
            .invalidate_if(
                length < MIN_USERNAME_LENGTH,
                UsernameInvalidity::MinLength(MIN_USERNAME_LENGTH),
            )
            .invalidate_if(
                length > MAX_USERNAME_LENGTH,
                UsernameInvalidity::MaxLength(MAX_USERNAME_LENGTH),
            )
            .invalidate_if(
                !self
                    .0
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_'),
                UsernameInvalidity::InvalidCharacters,
            )
            .into()
    }
}

impl ValidatedFrom<&str> for Username {
    fn validated_from(from: &str) -> ValidatedResult<Self> {
        let into = Self::unvalidated(from.to_owned());

        match into.validate() {
            Ok(()) => Ok(into),
            Err(context) => Err((into, context)),
        }
    }
}
