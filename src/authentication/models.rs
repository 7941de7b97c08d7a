//! Persisted authentication records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single registered administrator.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AdminUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// The administrator that is currently logged in.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CurrentAdmin {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub logged_in_at: DateTime<Utc>,
}

impl CurrentAdmin {
    pub fn for_user(user: &AdminUser, logged_in_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            logged_in_at,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CounterCredentials {
    pub username: String,
    pub password_hash: String,
    pub salt: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct LoginAttempts {
    pub count: u32,
    pub last_attempt_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Lockout {
    pub locked_until: DateTime<Utc>,
}

/// A time-boxed sales counter session.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CounterSession {
    pub id: Uuid,
    pub active: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl CounterSession {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.active && self.expires_at > now
    }
}
