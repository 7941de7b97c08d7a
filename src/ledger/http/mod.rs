use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::error;
use uuid::Uuid;

use crate::{
    authentication::http::ActiveSession,
    http_err::{ApiError, ApiResponse},
    server::AppState,
};

use super::services::{LedgerService, StatementError};

pub mod reps;

pub fn routes() -> Router<AppState> {
    Router::new().route("/customers/:customer_id/statement", get(get_statement))
}

async fn get_statement(
    _: ActiveSession,
    State(ledger_service): State<LedgerService>,
    Path(customer_id): Path<Uuid>,
) -> ApiResponse<Json<reps::Statement>> {
    match ledger_service.customer_statement(customer_id) {
        Ok(statement) => Ok(Json(reps::Statement::from(&statement))),
        Err(StatementError::CustomerNotFound(_)) => Err(ApiError::NotFound(
            "No customer found with the provided ID.".to_owned(),
        )),
        Err(error) => {
            error!(%customer_id, ?error, "Failed to build customer statement.");

            Err(ApiError::InternalServerError)
        }
    }
}
