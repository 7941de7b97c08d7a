use anyhow::Result;
use semval::prelude::*;
use serde::Deserialize;

use crate::passwords::{self, Password, PasswordInvalidity, Salt};

use super::username::{Username, UsernameInvalidity};

/// Credentials chosen for the sales counter during setup.
#[derive(Clone, Debug, Deserialize)]
pub struct CounterCredentialsData {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug)]
pub struct NewCounterCredentials {
    username: Username,
    password: Password,
    confirmation_matches: bool,
}

impl NewCounterCredentials {
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Hash the password with a freshly generated salt.
    pub fn salted_hash(&self) -> Result<(passwords::Hash, Salt)> {
        let salt = Salt::generate();
        let hash = passwords::Hash::with_salt(&self.password, &salt)?;

        Ok((hash, salt))
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum CounterCredentialsInvalidity {
    Username(UsernameInvalidity),
    Password(PasswordInvalidity),
}

impl Validate for NewCounterCredentials {
    type Invalidity = CounterCredentialsInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let mut context = ValidationContext::new()
            .validate_with(&self.username, CounterCredentialsInvalidity::Username)
            .invalidate_if(
                !self.confirmation_matches,
                CounterCredentialsInvalidity::Password(PasswordInvalidity::Mismatch),
            );

        if let Err(strength) = self.password.validate_strength() {
            for invalidity in strength.into_iter() {
                context = context.invalidate(CounterCredentialsInvalidity::Password(invalidity));
            }
        }

        context.into()
    }
}

impl ValidatedFrom<CounterCredentialsData> for NewCounterCredentials {
    fn validated_from(from: CounterCredentialsData) -> ValidatedResult<Self> {
        let into = Self {
            username: Username::unvalidated(from.username),
            confirmation_matches: from.password == from.confirm_password,
            password: Password::unvalidated(from.password),
        };

        match into.validate() {
            Ok(()) => Ok(into),
            Err(context) => Err((into, context)),
        }
    }
}
