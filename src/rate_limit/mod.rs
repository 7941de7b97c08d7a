//! Limiting of failed login attempts.
//!
//! After [`MAX_FAILED_ATTEMPTS`] consecutive failures the resource is locked
//! for [`LOCKOUT_MINUTES`]. Failures older than the lockout window no longer
//! count towards the limit.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    authentication::models::{Lockout, LoginAttempts},
    clock::DynClock,
    storage::RecordStore,
};

pub const MAX_FAILED_ATTEMPTS: u32 = 5;
pub const LOCKOUT_MINUTES: i64 = 15;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LockoutState {
    /// Attempts are currently accepted.
    NotLocked,
    /// Too many failed attempts. Attempts will be accepted again at the
    /// contained timestamp.
    LockedUntil(DateTime<Utc>),
}

/// The result of recording a failed attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailedAttempt {
    AttemptsRemaining(u32),
    LockedUntil(DateTime<Utc>),
}

/// Tracks failed attempts for one resource in the record store.
#[derive(Clone)]
pub struct LoginAttemptLimiter {
    records: RecordStore,
    clock: DynClock,
    attempts_key: &'static str,
    lockout_key: &'static str,
}

impl LoginAttemptLimiter {
    /// Create a new limiter.
    ///
    /// # Arguments
    ///
    /// * `records` - Where attempt counts and lockouts are persisted.
    /// * `clock` - The source of the current time.
    /// * `attempts_key` - Key holding the failed attempt counter.
    /// * `lockout_key` - Key holding the lockout record.
    pub fn new(
        records: RecordStore,
        clock: DynClock,
        attempts_key: &'static str,
        lockout_key: &'static str,
    ) -> Self {
        Self {
            records,
            clock,
            attempts_key,
            lockout_key,
        }
    }

    fn window() -> Duration {
        Duration::minutes(LOCKOUT_MINUTES)
    }

    /// Determine if attempts are currently blocked.
    ///
    /// An expired lockout is removed along with the attempt counter, so the
    /// next failure starts counting from zero again.
    pub fn check(&self) -> anyhow::Result<LockoutState> {
        let lockout: Option<Lockout> = self.records.read_or_discard(self.lockout_key)?;

        match lockout {
            Some(lockout) if lockout.locked_until > self.clock.now() => {
                Ok(LockoutState::LockedUntil(lockout.locked_until))
            }
            Some(_) => {
                debug!(key = self.lockout_key, "Lockout expired.");
                self.reset()?;

                Ok(LockoutState::NotLocked)
            }
            None => Ok(LockoutState::NotLocked),
        }
    }

    /// Record a failed attempt, locking the resource once the limit is hit.
    pub fn record_failure(&self) -> anyhow::Result<FailedAttempt> {
        let now = self.clock.now();
        let previous: Option<LoginAttempts> = self.records.read_or_discard(self.attempts_key)?;

        let count = match previous {
            Some(attempts) if now - attempts.last_attempt_at < Self::window() => {
                attempts.count + 1
            }
            _ => 1,
        };

        self.records.write(
            self.attempts_key,
            &LoginAttempts {
                count,
                last_attempt_at: now,
            },
        )?;

        if count >= MAX_FAILED_ATTEMPTS {
            let locked_until = now + Self::window();
            self.records
                .write(self.lockout_key, &Lockout { locked_until })?;

            info!(key = self.lockout_key, %locked_until, "Locked after too many failed attempts.");

            Ok(FailedAttempt::LockedUntil(locked_until))
        } else {
            Ok(FailedAttempt::AttemptsRemaining(MAX_FAILED_ATTEMPTS - count))
        }
    }

    /// The number of failures currently counted.
    #[cfg(test)]
    pub fn failed_attempts(&self) -> anyhow::Result<u32> {
        let attempts: Option<LoginAttempts> = self.records.read_or_discard(self.attempts_key)?;

        Ok(attempts.map(|a| a.count).unwrap_or(0))
    }

    /// Forget all failures and any lockout.
    pub fn reset(&self) -> anyhow::Result<()> {
        self.records.remove(self.attempts_key)?;
        self.records.remove(self.lockout_key)
    }
}

#[derive(Serialize)]
pub struct LockoutResponse {
    pub message: String,
    pub locked_until: DateTime<Utc>,
}

impl IntoResponse for LockoutState {
    fn into_response(self) -> Response {
        if let Self::LockedUntil(locked_until) = self {
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(LockoutResponse {
                    message: "Too many failed attempts. Please try again later.".to_string(),
                    locked_until,
                }),
            )
                .into_response()
        } else {
            // A `LockoutState` will typically only be converted to a response
            // in a failure scenario, but if an unlocked state is converted, we
            // just respond with a simple success status code.
            StatusCode::OK.into_response()
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use chrono::TimeZone;

    use crate::{
        clock::{Clock, ManualClock},
        storage::{keys, MemoryStore},
    };

    use super::*;

    fn limiter() -> (LoginAttemptLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc.ymd(2024, 3, 1).and_hms(9, 0, 0)));
        let limiter = LoginAttemptLimiter::new(
            RecordStore::new(Arc::new(MemoryStore::new())),
            clock.clone(),
            keys::COUNTER_LOGIN_ATTEMPTS,
            keys::COUNTER_LOCKOUT,
        );

        (limiter, clock)
    }

    #[test]
    fn counts_down_then_locks() -> anyhow::Result<()> {
        let (limiter, clock) = limiter();

        for remaining in (1..MAX_FAILED_ATTEMPTS).rev() {
            assert_eq!(
                FailedAttempt::AttemptsRemaining(remaining),
                limiter.record_failure()?
            );
        }

        let want_until = clock.now() + Duration::minutes(LOCKOUT_MINUTES);
        assert_eq!(FailedAttempt::LockedUntil(want_until), limiter.record_failure()?);
        assert_eq!(LockoutState::LockedUntil(want_until), limiter.check()?);

        Ok(())
    }

    #[test]
    fn expired_lockout_resets_counter() -> anyhow::Result<()> {
        let (limiter, clock) = limiter();
        for _ in 0..MAX_FAILED_ATTEMPTS {
            limiter.record_failure()?;
        }

        clock.advance(Duration::minutes(LOCKOUT_MINUTES) + Duration::seconds(1));

        assert_eq!(LockoutState::NotLocked, limiter.check()?);
        assert_eq!(0, limiter.failed_attempts()?);

        Ok(())
    }

    #[test]
    fn stale_failures_are_forgotten() -> anyhow::Result<()> {
        let (limiter, clock) = limiter();
        for _ in 0..3 {
            limiter.record_failure()?;
        }

        clock.advance(Duration::minutes(LOCKOUT_MINUTES));

        assert_eq!(
            FailedAttempt::AttemptsRemaining(MAX_FAILED_ATTEMPTS - 1),
            limiter.record_failure()?
        );

        Ok(())
    }
}
