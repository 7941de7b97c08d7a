use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts, State},
    http::{request::Parts, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, error, warn};

use crate::{
    http_err::{ApiError, ApiResponse},
    rate_limit::LockoutState,
    server::AppState,
    validation::FieldErrors,
};

use super::{
    domain::{
        admin::{NewAdminData, PasswordResetData},
        counter::CounterCredentialsData,
        session::ActiveRole,
    },
    services::{
        AdminLoginError, AdminService, CounterLoginError, CounterService, CounterSetupError,
        PasswordResetError, SessionService, SignupError,
    },
};

pub mod reps;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/signup", post(admin_signup))
        .route("/admin/login", post(admin_login))
        .route("/admin/logout", post(admin_logout))
        .route("/admin/password-reset", post(admin_password_reset))
        .route("/counter/status", get(counter_status))
        .route("/counter/setup", post(counter_setup))
        .route("/counter/login", post(counter_login))
        .route("/counter/logout", post(counter_logout))
        .route("/session", get(get_session))
}

/// Extractor that rejects requests unless an administrator or counter
/// session is active.
pub struct ActiveSession(pub ActiveRole);

#[async_trait]
impl<S> FromRequestParts<S> for ActiveSession
where
    SessionService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = SessionService::from_ref(state);

        match sessions.active_role()? {
            ActiveRole::None => {
                debug!(path = %parts.uri.path(), "Rejected request without an active role.");

                Err(ApiError::Unauthorized("Please log in.".to_owned()))
            }
            role => Ok(Self(role)),
        }
    }
}

async fn admin_signup(
    State(admins): State<AdminService>,
    Json(data): Json<NewAdminData>,
) -> ApiResponse<(StatusCode, Json<reps::Admin>)> {
    match admins.signup(data) {
        Ok(user) => Ok((StatusCode::CREATED, Json(reps::Admin::from(&user)))),
        Err(SignupError::Invalid(context)) => Err(FieldErrors::from_context(context).into()),
        Err(SignupError::Other(error)) => {
            error!(?error, "Failed to register administrator.");

            Err(ApiError::InternalServerError)
        }
    }
}

async fn admin_login(
    State(admins): State<AdminService>,
    Json(credentials): Json<reps::EmailPasswordPair>,
) -> ApiResponse<Json<reps::LoggedInAdmin>> {
    match admins.login(&credentials.email, &credentials.password) {
        Ok(admin) => Ok(Json(reps::LoggedInAdmin::from(&admin))),
        Err(AdminLoginError::InvalidCredentials) => Err(ApiError::Unauthorized(
            "Invalid email or password.".to_owned(),
        )),
        Err(AdminLoginError::Other(error)) => {
            error!(?error, "Failed to log in administrator.");

            Err(ApiError::InternalServerError)
        }
    }
}

async fn admin_logout(State(admins): State<AdminService>) -> ApiResponse<StatusCode> {
    admins.logout()?;

    Ok(StatusCode::NO_CONTENT)
}

async fn admin_password_reset(
    State(admins): State<AdminService>,
    Json(data): Json<PasswordResetData>,
) -> ApiResponse<StatusCode> {
    match admins.reset_password(data) {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(PasswordResetError::Invalid(context)) => {
            Err(FieldErrors::from_context(context).into())
        }
        Err(PasswordResetError::UnknownEmail) => {
            warn!("Password reset requested for an unknown email.");

            Err(ApiError::NotFound(
                "No administrator is registered with that email.".to_owned(),
            ))
        }
        Err(PasswordResetError::Other(error)) => {
            error!(?error, "Failed to reset administrator password.");

            Err(ApiError::InternalServerError)
        }
    }
}

async fn counter_status(
    State(counter): State<CounterService>,
) -> ApiResponse<Json<reps::CounterStatus>> {
    let locked_until = match counter.lockout_status()? {
        LockoutState::LockedUntil(until) => Some(until),
        LockoutState::NotLocked => None,
    };

    Ok(Json(reps::CounterStatus {
        configured: counter.is_configured()?,
        locked_until,
        remaining_seconds: counter.lockout_remaining_seconds()?,
    }))
}

async fn counter_setup(
    State(counter): State<CounterService>,
    Json(data): Json<CounterCredentialsData>,
) -> ApiResponse<(StatusCode, Json<reps::CounterSetup>)> {
    match counter.setup(data) {
        Ok(credentials) => Ok((
            StatusCode::CREATED,
            Json(reps::CounterSetup::from(&credentials)),
        )),
        Err(CounterSetupError::Invalid(context)) => Err(FieldErrors::from_context(context).into()),
        Err(CounterSetupError::AlreadyConfigured) => Err(ApiError::Conflict(
            "Counter credentials are already set up.".to_owned(),
        )),
        Err(CounterSetupError::Other(error)) => {
            error!(?error, "Failed to set up counter credentials.");

            Err(ApiError::InternalServerError)
        }
    }
}

async fn counter_login(
    State(counter): State<CounterService>,
    Json(credentials): Json<reps::UsernamePasswordPair>,
) -> ApiResponse<Json<reps::CounterSessionRep>> {
    match counter.login(&credentials.username, &credentials.password) {
        Ok(session) => Ok(Json(reps::CounterSessionRep::from(&session))),
        Err(CounterLoginError::NotConfigured) => Err(ApiError::Conflict(
            "Counter credentials have not been set up.".to_owned(),
        )),
        Err(CounterLoginError::InvalidCredentials { remaining_attempts }) => {
            Err(ApiError::Unauthorized(format!(
                "Invalid username or password. {} attempts remaining.",
                remaining_attempts
            )))
        }
        Err(CounterLoginError::LockedOut(state)) => Err(state.into()),
        Err(CounterLoginError::Other(error)) => {
            error!(?error, "Failed to log in to the counter.");

            Err(ApiError::InternalServerError)
        }
    }
}

async fn counter_logout(State(counter): State<CounterService>) -> ApiResponse<StatusCode> {
    counter.logout()?;

    Ok(StatusCode::NO_CONTENT)
}

async fn get_session(State(sessions): State<SessionService>) -> ApiResponse<Json<reps::Session>> {
    let role = sessions.active_role()?;

    Ok(Json(reps::Session::from(&role)))
}
