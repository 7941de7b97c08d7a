use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    authentication::{
        domain::{
            admin::{NameInvalidity, NewAdminInvalidity, PasswordResetInvalidity},
            counter::CounterCredentialsInvalidity,
            email::EmailInvalidity,
            session::ActiveRole,
            username::UsernameInvalidity,
        },
        models::{AdminUser, CounterCredentials, CounterSession, CurrentAdmin},
    },
    passwords::PasswordInvalidity,
    validation::Describe,
};

#[derive(Deserialize)]
pub struct EmailPasswordPair {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct UsernamePasswordPair {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct Admin {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&AdminUser> for Admin {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct LoggedInAdmin {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub logged_in_at: DateTime<Utc>,
}

impl From<&CurrentAdmin> for LoggedInAdmin {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            user_id: admin.user_id,
            name: admin.name.clone(),
            email: admin.email.clone(),
            logged_in_at: admin.logged_in_at,
        }
    }
}

#[derive(Serialize)]
pub struct CounterSetup {
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<&CounterCredentials> for CounterSetup {
    fn from(credentials: &CounterCredentials) -> Self {
        Self {
            username: credentials.username.clone(),
            created_at: credentials.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct CounterSessionRep {
    pub id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<&CounterSession> for CounterSessionRep {
    fn from(session: &CounterSession) -> Self {
        Self {
            id: session.id,
            expires_at: session.expires_at,
            created_at: session.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct CounterStatus {
    pub configured: bool,
    pub locked_until: Option<DateTime<Utc>>,
    pub remaining_seconds: i64,
}

#[derive(Serialize)]
pub struct Session {
    /// `"admin"`, `"counter"`, or `null` when nobody is logged in.
    pub role: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<LoggedInAdmin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter: Option<CounterSessionRep>,
}

impl From<&ActiveRole> for Session {
    fn from(role: &ActiveRole) -> Self {
        let (admin, counter) = match role {
            ActiveRole::Admin(admin) => (Some(admin.into()), None),
            ActiveRole::Counter(session) => (None, Some(session.into())),
            ActiveRole::None => (None, None),
        };

        Self {
            role: role.name(),
            admin,
            counter,
        }
    }
}

fn email_message(invalidity: &EmailInvalidity) -> String {
    match invalidity {
        EmailInvalidity::MissingDomain => "Email is missing a domain.".to_owned(),
        EmailInvalidity::MissingSeparator => "Email is missing an '@' symbol.".to_owned(),
    }
}

fn password_message(invalidity: &PasswordInvalidity) -> String {
    match invalidity {
        PasswordInvalidity::MaxLength(max) => format!(
            "Passwords may not contain more than {} characters.",
            max
        ),
        PasswordInvalidity::MinLength(min) => {
            format!("Passwords must contain at least {} characters.", min)
        }
        PasswordInvalidity::Weak { score, required } => format!(
            "Password is too weak (strength {} of {} required). Mix upper and lower case letters, digits and symbols.",
            score, required
        ),
        PasswordInvalidity::Mismatch => "Passwords do not match.".to_owned(),
    }
}

fn password_field(invalidity: &PasswordInvalidity) -> &'static str {
    match invalidity {
        PasswordInvalidity::Mismatch => "confirm_password",
        _ => "password",
    }
}

impl Describe for NewAdminInvalidity {
    fn field(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Email(_) => "email",
            Self::Password(password) => password_field(password),
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Name(NameInvalidity::Blank) => "Name is required.".to_owned(),
            Self::Name(NameInvalidity::MaxLength(max)) => {
                format!("Names may not contain more than {} characters.", max)
            }
            Self::Email(email) => email_message(email),
            Self::Password(password) => password_message(password),
        }
    }
}

impl Describe for PasswordResetInvalidity {
    fn field(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::Password(PasswordInvalidity::Mismatch) => "confirm_password",
            Self::Password(_) => "new_password",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Email(email) => email_message(email),
            Self::Password(password) => password_message(password),
        }
    }
}

impl Describe for CounterCredentialsInvalidity {
    fn field(&self) -> &'static str {
        match self {
            Self::Username(_) => "username",
            Self::Password(password) => password_field(password),
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Username(UsernameInvalidity::MinLength(min)) => {
                format!("Usernames must contain at least {} characters.", min)
            }
            Self::Username(UsernameInvalidity::MaxLength(max)) => {
                format!("Usernames may not contain more than {} characters.", max)
            }
            Self::Username(UsernameInvalidity::InvalidCharacters) => {
                "Usernames may only contain letters, digits and underscores.".to_owned()
            }
            Self::Password(password) => password_message(password),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn password_mismatch_is_reported_on_confirmation() {
        let invalidity = NewAdminInvalidity::Password(PasswordInvalidity::Mismatch);

        assert_eq!("confirm_password", invalidity.field());
        assert_eq!("Passwords do not match.", invalidity.message());
    }

    #[test]
    fn reset_password_errors_use_request_field_names() {
        assert_eq!(
            "new_password",
            PasswordResetInvalidity::Password(PasswordInvalidity::MinLength(8)).field()
        );
        assert_eq!(
            "email",
            PasswordResetInvalidity::Email(EmailInvalidity::MissingDomain).field()
        );
    }

    #[test]
    fn session_rep_for_nobody() {
        let rep = Session::from(&ActiveRole::None);

        assert_eq!(
            serde_json::json!({ "role": null }),
            serde_json::to_value(&rep).expect("session should serialize")
        );
    }
}
