use anyhow::Result;
use semval::prelude::*;
use serde::Deserialize;
use uuid::Uuid;

use crate::passwords::{self, Password, PasswordInvalidity};

use super::email::{Email, EmailInvalidity};

const MAX_NAME_LENGTH: usize = 100;

/// Signup information provided by a prospective administrator.
#[derive(Clone, Debug, Deserialize)]
pub struct NewAdminData {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug)]
pub struct NewAdmin {
    id: Uuid,
    name: String,
    email: Email,
    password: Password,
    confirmation_matches: bool,
}

impl NewAdmin {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> Result<passwords::Hash> {
        passwords::Hash::new(&self.password)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NameInvalidity {
    Blank,
    MaxLength(usize),
}

#[derive(Debug, Eq, PartialEq)]
pub enum NewAdminInvalidity {
    Name(NameInvalidity),
    Email(EmailInvalidity),
    Password(PasswordInvalidity),
}

impl Validate for NewAdmin {
    type Invalidity = NewAdminInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(
                self.name.is_empty(),
                NewAdminInvalidity::Name(NameInvalidity::Blank),
            )
            .invalidate_if(
                self.name.chars().count() > MAX_NAME_LENGTH,
                NewAdminInvalidity::Name(NameInvalidity::MaxLength(MAX_NAME_LENGTH)),
            )
            .validate_with(&self.email, NewAdminInvalidity::Email)
            .validate_with(&self.password, NewAdminInvalidity::Password)
            .invalidate_if(
                !self.confirmation_matches,
                NewAdminInvalidity::Password(PasswordInvalidity::Mismatch),
            )
            .into()
    }
}

impl ValidatedFrom<NewAdminData> for NewAdmin {
    fn validated_from(from: NewAdminData) -> ValidatedResult<Self> {
        let into = NewAdmin {
            id: Uuid::new_v4(),
            name: from.name.trim().to_owned(),
            email: Email::unvalidated(from.email),
            confirmation_matches: from.password == from.confirm_password,
            password: Password::unvalidated(from.password),
        };

        match into.validate() {
            Ok(()) => Ok(into),
            Err(context) => Err((into, context)),
        }
    }
}

/// A request to replace the registered administrator's password.
#[derive(Clone, Debug, Deserialize)]
pub struct PasswordResetData {
    pub email: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug)]
pub struct PasswordReset {
    email: Email,
    new_password: Password,
    confirmation_matches: bool,
}

impl PasswordReset {
    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> Result<passwords::Hash> {
        passwords::Hash::new(&self.new_password)
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum PasswordResetInvalidity {
    Email(EmailInvalidity),
    Password(PasswordInvalidity),
}

impl Validate for PasswordReset {
    type Invalidity = PasswordResetInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .validate_with(&self.email, PasswordResetInvalidity::Email)
            .validate_with(&self.new_password, PasswordResetInvalidity::Password)
            .invalidate_if(
                !self.confirmation_matches,
                PasswordResetInvalidity::Password(PasswordInvalidity::Mismatch),
            )
            .into()
    }
}

impl ValidatedFrom<PasswordResetData> for PasswordReset {
    fn validated_from(from: PasswordResetData) -> ValidatedResult<Self> {
        let into = PasswordReset {
            email: Email::unvalidated(from.email),
            confirmation_matches: from.new_password == from.confirm_password,
            new_password: Password::unvalidated(from.new_password),
        };

        match into.validate() {
            Ok(()) => Ok(into),
            Err(context) => Err((into, context)),
        }
    }
}
