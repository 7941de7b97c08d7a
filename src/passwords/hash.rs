use anyhow::{anyhow, Result};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use password_hash::SaltString;
use rand_core::OsRng;

use super::Password;

/// A random salt mixed into a password hash.
///
/// The counter stores its salt next to the hash so a login attempt can be
/// hashed the same way and compared.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Salt(String);

impl Salt {
    pub fn generate() -> Self {
        Self(SaltString::generate(&mut OsRng).as_str().to_owned())
    }

    /// Parse a salt read back from storage. Fails if the value is not valid
    /// B64 salt.
    pub fn from_persisted(value: &str) -> Result<Self> {
        Ok(Self(SaltString::new(value)?.as_str().to_owned()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

/// An argon2 password hash in PHC string format.
#[derive(Clone, Debug)]
pub struct Hash(String);

impl Hash {
    /// Hash a password with a fresh salt.
    pub fn new(password: &Password) -> Result<Self> {
        Self::with_salt(password, &Salt::generate())
    }

    /// Hash a password with a known salt. The result is deterministic for a
    /// given password and salt.
    pub fn with_salt(password: &Password, salt: &Salt) -> Result<Self> {
        let phc = Argon2::default()
            .hash_password(password.as_bytes(), salt.value())?
            .to_string();

        Ok(Self(phc))
    }

    /// Parse a persisted hash.
    pub fn from_hash_str(hash: &str) -> Result<Self> {
        Ok(Self(PasswordHash::new(hash)?.to_string()))
    }

    /// Check a raw password against the hash. A mismatch is `Ok(false)`;
    /// only a malformed hash is an error.
    pub fn matches_raw_password(&self, raw_password: &str) -> Result<bool> {
        let parsed = PasswordHash::new(&self.0)?;

        match Argon2::default().verify_password(raw_password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(other) => Err(other.into()),
        }
    }

    /// The salt embedded in the PHC string.
    pub fn salt(&self) -> Result<Salt> {
        let salt = PasswordHash::new(&self.0)?
            .salt
            .ok_or_else(|| anyhow!("password hash has no salt"))?;

        Salt::from_persisted(salt.as_str())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn password() -> Password {
        Password::unvalidated("Bottles&Crates42".to_owned())
    }

    #[test]
    fn hash_verifies_only_its_password() -> Result<()> {
        let hash = Hash::new(&password())?;

        assert!(hash.matches_raw_password("Bottles&Crates42")?);
        assert!(!hash.matches_raw_password("bottles&crates42")?);

        Ok(())
    }

    #[test]
    fn same_salt_same_hash() -> Result<()> {
        let salt = Salt::generate();

        let first = Hash::with_salt(&password(), &salt)?;
        let second = Hash::with_salt(&password(), &salt)?;

        assert_eq!(first.value(), second.value());
        assert_eq!(salt, first.salt()?);

        Ok(())
    }

    #[test]
    fn fresh_salts_differ() -> Result<()> {
        let first = Hash::new(&password())?;
        let second = Hash::new(&password())?;

        assert_ne!(first.value(), second.value());

        Ok(())
    }

    #[test]
    fn persisted_values_are_checked() {
        assert!(Hash::from_hash_str("plaintext").is_err());
        assert!(Salt::from_persisted("not a salt!").is_err());
    }
}
