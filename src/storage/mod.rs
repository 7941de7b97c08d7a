//! Key-value persistence.
//!
//! Everything the application remembers lives behind [`KeyValueStore`]. Values
//! are stored as versioned JSON envelopes, see [`records`].

mod memory;
pub mod records;
mod redis;

use std::sync::Arc;

use thiserror::Error;

pub use self::memory::MemoryStore;
pub use self::records::{RecordRead, RecordStore};
pub use self::redis::RedisStore;

/// Keys used to persist application state.
pub mod keys {
    pub const CURRENT_ADMIN: &str = "admin:current_user";
    pub const REGISTERED_ADMIN: &str = "admin:registered_user";

    pub const COUNTER_CREDENTIALS: &str = "counter:credentials";
    pub const COUNTER_LOGIN_ATTEMPTS: &str = "counter:login_attempts";
    pub const COUNTER_LOCKOUT: &str = "counter:lockout";
    pub const COUNTER_SESSION: &str = "counter:session";

    pub const CUSTOMERS: &str = "dashboard:customers";
    pub const INVENTORY: &str = "dashboard:inventory";
    pub const REMINDERS: &str = "dashboard:reminders";
    pub const SALES: &str = "dashboard:sales";
    pub const SALESMEN: &str = "dashboard:salesmen";
}

#[derive(Debug, Error)]
pub enum StorageError {
    /// The value stored under the key could not be decoded.
    #[error("corrupt record under {key:?}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// A minimal string key-value store.
///
/// Implementations must be safe to share between request handlers, but no
/// guarantees are made about atomicity across multiple calls.
pub trait KeyValueStore: Send + Sync {
    /// Fetch the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Remove the value stored under `key`. Removing a missing key is not an
    /// error.
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}

pub type DynStore = Arc<dyn KeyValueStore>;
