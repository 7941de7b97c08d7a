use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::{rate_limit::LockoutState, storage::StorageError, validation::FieldErrors};

#[derive(Debug)]
pub enum ApiError {
    /// Input failed validation. Messages are grouped by field.
    BadRequest(FieldErrors),
    BadRequestReason(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    TooManyRequests(LockoutState),
    InternalServerError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorRep {
                    message: "The provided data is invalid.".to_owned(),
                    errors,
                }),
            )
                .into_response(),
            Self::BadRequestReason(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorRep { message })).into_response()
            }
            Self::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, Json(ErrorRep { message })).into_response()
            }
            Self::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorRep { message })).into_response()
            }
            Self::Conflict(message) => {
                (StatusCode::CONFLICT, Json(ErrorRep { message })).into_response()
            }
            Self::TooManyRequests(state) => state.into_response(),
            Self::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRep {
                    message: "Internal server error.".to_owned(),
                }),
            )
                .into_response(),
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self::BadRequest(errors)
    }
}

impl From<LockoutState> for ApiError {
    fn from(state: LockoutState) -> Self {
        Self::TooManyRequests(state)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        error!(?error, "Received error.");

        Self::InternalServerError
    }
}

impl From<StorageError> for ApiError {
    fn from(error: StorageError) -> Self {
        error!(?error, "Storage failure.");

        Self::InternalServerError
    }
}

pub type ApiResponse<T> = Result<T, ApiError>;

#[derive(Serialize)]
pub struct ErrorRep {
    pub message: String,
}

#[derive(Serialize)]
pub struct ValidationErrorRep {
    pub message: String,
    pub errors: FieldErrors,
}
