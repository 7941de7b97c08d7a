use anyhow::Context;
use chrono::Duration;
use semval::ValidatedFrom;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    clock::DynClock,
    passwords::{self, Password, Salt},
    rate_limit::{FailedAttempt, LockoutState, LoginAttemptLimiter},
    storage::{keys, RecordStore},
};

use super::{
    domain::{
        admin::{
            NewAdmin, NewAdminData, NewAdminInvalidity, PasswordReset, PasswordResetData,
            PasswordResetInvalidity,
        },
        counter::{CounterCredentialsData, CounterCredentialsInvalidity, NewCounterCredentials},
        email::Email,
        session::ActiveRole,
        username::Username,
    },
    models::{AdminUser, CounterCredentials, CounterSession, CurrentAdmin},
};

/// How long a counter session stays valid after login.
pub const COUNTER_SESSION_HOURS: i64 = 8;

#[derive(Debug, Error)]
pub enum SignupError {
    #[error("invalid signup data: {0:?}")]
    Invalid(semval::context::Context<NewAdminInvalidity>),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum AdminLoginError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum PasswordResetError {
    #[error("invalid password reset data: {0:?}")]
    Invalid(semval::context::Context<PasswordResetInvalidity>),

    /// No registered administrator uses the provided email.
    #[error("unknown email address")]
    UnknownEmail,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A service object providing the administrator login flow.
///
/// Only a single administrator is supported. Signing up replaces whoever was
/// registered before.
#[derive(Clone)]
pub struct AdminService {
    records: RecordStore,
    clock: DynClock,
}

impl AdminService {
    pub fn new(records: RecordStore, clock: DynClock) -> Self {
        Self { records, clock }
    }

    /// Register the administrator, replacing any existing registration.
    pub fn signup(&self, data: NewAdminData) -> Result<AdminUser, SignupError> {
        let new_admin =
            NewAdmin::validated_from(data).map_err(|(_, context)| SignupError::Invalid(context))?;

        let user = AdminUser {
            id: new_admin.id(),
            name: new_admin.name().to_owned(),
            email: new_admin.email().address().to_owned(),
            password_hash: new_admin
                .password_hash()
                .context("Failed to hash admin password.")?
                .value()
                .to_owned(),
            created_at: self.clock.now(),
        };

        if self.registered_user()?.is_some() {
            warn!(user_id = %user.id, "Replacing previously registered admin.");
        }

        self.records.write(keys::REGISTERED_ADMIN, &user)?;
        info!(user_id = %user.id, "Registered admin.");

        Ok(user)
    }

    /// Log in as the registered administrator.
    pub fn login(&self, email: &str, password: &str) -> Result<CurrentAdmin, AdminLoginError> {
        let user = match self.registered_user()? {
            Some(user) => user,
            None => {
                debug!("Admin login attempted with no registered admin.");

                return Err(AdminLoginError::InvalidCredentials);
            }
        };

        if !Email::unvalidated(email.to_owned()).matches(&user.email) {
            return Err(AdminLoginError::InvalidCredentials);
        }

        let hash = passwords::Hash::from_hash_str(&user.password_hash)
            .context("Invalid password hash stored for admin.")?;
        if !hash.matches_raw_password(password)? {
            return Err(AdminLoginError::InvalidCredentials);
        }

        let current = CurrentAdmin::for_user(&user, self.clock.now());
        self.records.write(keys::CURRENT_ADMIN, &current)?;

        debug!(user_id = %user.id, "Validated admin credentials.");

        Ok(current)
    }

    /// Replace the registered administrator's password.
    pub fn reset_password(&self, data: PasswordResetData) -> Result<(), PasswordResetError> {
        let reset = PasswordReset::validated_from(data)
            .map_err(|(_, context)| PasswordResetError::Invalid(context))?;

        let mut user = match self.registered_user()? {
            Some(user) if reset.email().matches(&user.email) => user,
            _ => return Err(PasswordResetError::UnknownEmail),
        };

        user.password_hash = reset
            .password_hash()
            .context("Failed to hash new admin password.")?
            .value()
            .to_owned();
        self.records.write(keys::REGISTERED_ADMIN, &user)?;

        // Anyone logged in with the old password is logged out.
        self.records.remove(keys::CURRENT_ADMIN)?;

        info!(user_id = %user.id, "Reset admin password.");

        Ok(())
    }

    pub fn logout(&self) -> anyhow::Result<()> {
        self.records.remove(keys::CURRENT_ADMIN)
    }

    pub fn registered_user(&self) -> anyhow::Result<Option<AdminUser>> {
        self.records.read_or_discard(keys::REGISTERED_ADMIN)
    }
}

#[derive(Debug, Error)]
pub enum CounterSetupError {
    #[error("invalid counter credentials: {0:?}")]
    Invalid(semval::context::Context<CounterCredentialsInvalidity>),

    #[error("counter credentials are already configured")]
    AlreadyConfigured,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum CounterLoginError {
    #[error("counter credentials have not been set up")]
    NotConfigured,

    #[error("invalid username or password ({remaining_attempts} attempts remaining)")]
    InvalidCredentials { remaining_attempts: u32 },

    #[error("counter login is locked")]
    LockedOut(LockoutState),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A service object providing the sales counter credential gate.
#[derive(Clone)]
pub struct CounterService {
    records: RecordStore,
    clock: DynClock,
    limiter: LoginAttemptLimiter,
}

impl CounterService {
    pub fn new(records: RecordStore, clock: DynClock) -> Self {
        let limiter = LoginAttemptLimiter::new(
            records.clone(),
            clock.clone(),
            keys::COUNTER_LOGIN_ATTEMPTS,
            keys::COUNTER_LOCKOUT,
        );

        Self {
            records,
            clock,
            limiter,
        }
    }

    pub fn is_configured(&self) -> anyhow::Result<bool> {
        Ok(self.credentials()?.is_some())
    }

    /// Store the counter credentials. Existing credentials are never
    /// overwritten.
    pub fn setup(
        &self,
        data: CounterCredentialsData,
    ) -> Result<CounterCredentials, CounterSetupError> {
        if self.is_configured()? {
            return Err(CounterSetupError::AlreadyConfigured);
        }

        let new_credentials = NewCounterCredentials::validated_from(data)
            .map_err(|(_, context)| CounterSetupError::Invalid(context))?;

        let (hash, salt) = new_credentials
            .salted_hash()
            .context("Failed to hash counter password.")?;

        let credentials = CounterCredentials {
            username: new_credentials.username().value().to_owned(),
            password_hash: hash.value().to_owned(),
            salt: salt.value().to_owned(),
            created_at: self.clock.now(),
        };

        self.records.write(keys::COUNTER_CREDENTIALS, &credentials)?;
        info!(username = %credentials.username, "Configured counter credentials.");

        Ok(credentials)
    }

    /// Log in to the sales counter.
    ///
    /// Attempts made while locked out are rejected without being counted.
    pub fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<CounterSession, CounterLoginError> {
        if let locked @ LockoutState::LockedUntil(_) = self.limiter.check()? {
            return Err(CounterLoginError::LockedOut(locked));
        }

        let credentials = self
            .credentials()?
            .ok_or(CounterLoginError::NotConfigured)?;

        if !self.credentials_match(&credentials, username, password)? {
            return match self.limiter.record_failure()? {
                FailedAttempt::AttemptsRemaining(remaining_attempts) => {
                    debug!(remaining_attempts, "Rejected counter login.");

                    Err(CounterLoginError::InvalidCredentials { remaining_attempts })
                }
                FailedAttempt::LockedUntil(until) => Err(CounterLoginError::LockedOut(
                    LockoutState::LockedUntil(until),
                )),
            };
        }

        self.limiter.reset()?;

        let now = self.clock.now();
        let session = CounterSession {
            id: Uuid::new_v4(),
            active: true,
            expires_at: now + Duration::hours(COUNTER_SESSION_HOURS),
            created_at: now,
        };
        self.records.write(keys::COUNTER_SESSION, &session)?;

        info!(session_id = %session.id, expires_at = %session.expires_at, "Started counter session.");

        Ok(session)
    }

    fn credentials_match(
        &self,
        credentials: &CounterCredentials,
        username: &str,
        password: &str,
    ) -> anyhow::Result<bool> {
        if !Username::unvalidated(credentials.username.clone()).matches(username) {
            return Ok(false);
        }

        let salt = Salt::from_persisted(&credentials.salt)
            .context("Invalid salt stored for counter credentials.")?;
        let candidate =
            passwords::Hash::with_salt(&Password::unvalidated(password.to_owned()), &salt)?;

        Ok(candidate.value() == credentials.password_hash)
    }

    /// The current lockout state, for displaying a countdown.
    pub fn lockout_status(&self) -> anyhow::Result<LockoutState> {
        self.limiter.check()
    }

    /// Whole seconds until login attempts are accepted again. Zero when not
    /// locked.
    pub fn lockout_remaining_seconds(&self) -> anyhow::Result<i64> {
        match self.limiter.check()? {
            LockoutState::LockedUntil(until) => Ok((until - self.clock.now()).num_seconds().max(0)),
            LockoutState::NotLocked => Ok(0),
        }
    }

    pub fn logout(&self) -> anyhow::Result<()> {
        self.records.remove(keys::COUNTER_SESSION)
    }

    fn credentials(&self) -> anyhow::Result<Option<CounterCredentials>> {
        self.records.read_or_discard(keys::COUNTER_CREDENTIALS)
    }
}

/// Resolves which role, if any, is currently logged in.
#[derive(Clone)]
pub struct SessionService {
    records: RecordStore,
    clock: DynClock,
}

impl SessionService {
    pub fn new(records: RecordStore, clock: DynClock) -> Self {
        Self { records, clock }
    }

    /// Determine the active role.
    ///
    /// A logged-in administrator takes precedence over a counter session.
    /// Expired or unreadable session records are removed.
    pub fn active_role(&self) -> anyhow::Result<ActiveRole> {
        if let Some(admin) = self.records.read_or_discard::<CurrentAdmin>(keys::CURRENT_ADMIN)? {
            return Ok(ActiveRole::Admin(admin));
        }

        match self
            .records
            .read_or_discard::<CounterSession>(keys::COUNTER_SESSION)?
        {
            Some(session) if session.is_valid_at(self.clock.now()) => {
                Ok(ActiveRole::Counter(session))
            }
            Some(session) => {
                debug!(session_id = %session.id, "Discarding expired counter session.");
                self.records.remove(keys::COUNTER_SESSION)?;

                Ok(ActiveRole::None)
            }
            None => Ok(ActiveRole::None),
        }
    }
}
