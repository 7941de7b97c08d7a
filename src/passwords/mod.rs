/// Dealing with user passwords.
mod hash;
mod password;

pub use hash::{Hash, Salt};
pub use password::{Password, PasswordInvalidity, MIN_STRENGTH_SCORE};
