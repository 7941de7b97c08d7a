use std::fmt::Debug;

use semval::prelude::*;

const MAX_PASSWORD_LENGTH: usize = 512;
const MIN_PASSWORD_LENGTH: usize = 8;
const LONG_PASSWORD_LENGTH: usize = 12;

/// The lowest [`Password::strength_score`] accepted where a strong password
/// is required.
pub const MIN_STRENGTH_SCORE: u8 = 4;

/// A raw password as typed by the administrator or at the counter.
pub struct Password(String);

impl Password {
    /// Wrap a password without checking it, for when the containing signup or
    /// setup data is validated as a whole.
    pub fn unvalidated(password: String) -> Self {
        Self(password)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Score the password from 0 to 6.
    ///
    /// One point each for being at least 8 characters, being at least 12
    /// characters, and containing a lowercase letter, an uppercase letter, a
    /// digit, and a symbol.
    pub fn strength_score(&self) -> u8 {
        let length = self.0.chars().count();
        let checks = [
            length >= MIN_PASSWORD_LENGTH,
            length >= LONG_PASSWORD_LENGTH,
            self.0.chars().any(|c| c.is_lowercase()),
            self.0.chars().any(|c| c.is_uppercase()),
            self.0.chars().any(|c| c.is_ascii_digit()),
            self.0
                .chars()
                .any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
        ];

        checks.iter().filter(|passed| **passed).count() as u8
    }

    /// Validate that the password is long enough and scores at least
    /// [`MIN_STRENGTH_SCORE`].
    pub fn validate_strength(&self) -> ValidationResult<PasswordInvalidity> {
        let score = self.strength_score();

        ValidationContext::new()
            .validate(self)
            .invalidate_if(
                score < MIN_STRENGTH_SCORE,
                PasswordInvalidity::Weak {
                    score,
                    required: MIN_STRENGTH_SCORE,
                },
            )
            .into()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PasswordInvalidity {
    /// Longer than the contained number of characters.
    MaxLength(usize),
    /// Shorter than the contained number of characters.
    MinLength(usize),
    /// The password does not reach the required strength score.
    Weak { score: u8, required: u8 },
    /// The password and its confirmation differ.
    Mismatch,
}

impl Validate for Password {
    type Invalidity = PasswordInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let length = self.0.chars().count();

        ValidationContext::new()
            .invalidate_if(
                length < MIN_PASSWORD_LENGTH,
                PasswordInvalidity::MinLength(MIN_PASSWORD_LENGTH),
            )
            .invalidate_if(
                length > MAX_PASSWORD_LENGTH,
                PasswordInvalidity::MaxLength(MAX_PASSWORD_LENGTH),
            )
            .into()
    }
}

impl ValidatedFrom<&str> for Password {
    fn validated_from(from: &str) -> ValidatedResult<Self> {
        let into = Password(from.to_owned());

        match into.validate() {
            Ok(_) => Ok(into),
            Err(context) => Err((into, context)),
        }
    }
}

impl Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never leak the raw value into logs.
        f.debug_tuple("Password").field(&"*".repeat(8)).finish()
    }
}
