use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::{
    authentication::http::ActiveSession,
    http_err::{ApiError, ApiResponse},
    server::AppState,
};

use super::{
    domain::{
        customers::{CustomerData, NewCustomerData},
        inventory::InventoryItemData,
        reminders::ReminderData,
        sales::{ClearBalanceData, EmptiesCollectionData, PaymentData, SaleData, SaleUpdateData},
        salesmen::SalesmanData,
    },
    models::{Customer, InventoryItem, Reminder, Sale, Salesman},
    services::{DashboardError, DashboardService},
};

pub mod reps;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/:customer_id",
            get(get_customer)
                .put(update_customer)
                .delete(delete_customer),
        )
        .route("/customers/:customer_id/payments", post(record_payment))
        .route("/customers/:customer_id/clear-balance", post(clear_balance))
        .route("/customers/:customer_id/empties", post(collect_empties))
        .route("/sales", get(list_sales).post(record_sale))
        .route("/sales/:sale_id", put(update_sale))
        .route(
            "/inventory",
            get(list_inventory).post(create_inventory_item),
        )
        .route(
            "/inventory/:item_id",
            put(update_inventory_item).delete(delete_inventory_item),
        )
        .route("/salesmen", get(list_salesmen).post(create_salesman))
        .route("/salesmen/:salesman_id", delete(delete_salesman))
        .route("/reminders", get(list_reminders).post(record_reminder))
        .route("/deliveries/due", get(due_for_delivery))
}

impl From<DashboardError> for ApiError {
    fn from(error: DashboardError) -> Self {
        match error {
            DashboardError::Invalid(errors) => Self::BadRequest(errors),
            DashboardError::NotFound(kind) => {
                Self::NotFound(format!("No {} found with the provided ID.", kind))
            }
            DashboardError::Storage(error) => error.into(),
        }
    }
}

async fn list_customers(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
) -> ApiResponse<Json<reps::ResourceCollection<Customer>>> {
    Ok(Json(dashboard.list_customers()?.into()))
}

async fn get_customer(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
    Path(customer_id): Path<Uuid>,
) -> ApiResponse<Json<Customer>> {
    Ok(Json(dashboard.get_customer(customer_id)?))
}

async fn create_customer(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
    Json(data): Json<NewCustomerData>,
) -> ApiResponse<(StatusCode, Json<Customer>)> {
    Ok((StatusCode::CREATED, Json(dashboard.create_customer(data)?)))
}

async fn update_customer(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
    Path(customer_id): Path<Uuid>,
    Json(data): Json<CustomerData>,
) -> ApiResponse<Json<Customer>> {
    Ok(Json(dashboard.update_customer(customer_id, data)?))
}

async fn delete_customer(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
    Path(customer_id): Path<Uuid>,
) -> ApiResponse<StatusCode> {
    dashboard.delete_customer(customer_id)?;

    Ok(StatusCode::NO_CONTENT)
}

async fn record_payment(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
    Path(customer_id): Path<Uuid>,
    Json(data): Json<PaymentData>,
) -> ApiResponse<(StatusCode, Json<Sale>)> {
    Ok((
        StatusCode::CREATED,
        Json(dashboard.record_payment(customer_id, data)?),
    ))
}

pub enum ClearBalanceResponse {
    Cleared(Sale),
    AlreadyClear,
}

impl IntoResponse for ClearBalanceResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Cleared(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
            Self::AlreadyClear => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

async fn clear_balance(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
    Path(customer_id): Path<Uuid>,
    Json(data): Json<ClearBalanceData>,
) -> ApiResponse<ClearBalanceResponse> {
    match dashboard.clear_balance(customer_id, data)? {
        Some(entry) => Ok(ClearBalanceResponse::Cleared(entry)),
        None => Ok(ClearBalanceResponse::AlreadyClear),
    }
}

async fn collect_empties(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
    Path(customer_id): Path<Uuid>,
    Json(data): Json<EmptiesCollectionData>,
) -> ApiResponse<Json<Customer>> {
    Ok(Json(dashboard.collect_empties(customer_id, data)?))
}

async fn list_sales(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
    Query(params): Query<reps::SalesParams>,
) -> ApiResponse<Json<reps::ResourceCollection<Sale>>> {
    Ok(Json(dashboard.list_sales(params.customer_id)?.into()))
}

async fn record_sale(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
    Json(data): Json<SaleData>,
) -> ApiResponse<(StatusCode, Json<Sale>)> {
    Ok((StatusCode::CREATED, Json(dashboard.record_sale(data)?)))
}

async fn update_sale(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
    Path(sale_id): Path<Uuid>,
    Json(data): Json<SaleUpdateData>,
) -> ApiResponse<Json<Sale>> {
    Ok(Json(dashboard.update_sale(sale_id, data)?))
}

async fn list_inventory(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
) -> ApiResponse<Json<reps::ResourceCollection<InventoryItem>>> {
    Ok(Json(dashboard.list_inventory()?.into()))
}

async fn create_inventory_item(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
    Json(data): Json<InventoryItemData>,
) -> ApiResponse<(StatusCode, Json<InventoryItem>)> {
    Ok((
        StatusCode::CREATED,
        Json(dashboard.create_inventory_item(data)?),
    ))
}

async fn update_inventory_item(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
    Path(item_id): Path<Uuid>,
    Json(data): Json<InventoryItemData>,
) -> ApiResponse<Json<InventoryItem>> {
    Ok(Json(dashboard.update_inventory_item(item_id, data)?))
}

async fn delete_inventory_item(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
    Path(item_id): Path<Uuid>,
) -> ApiResponse<StatusCode> {
    dashboard.delete_inventory_item(item_id)?;

    Ok(StatusCode::NO_CONTENT)
}

async fn list_salesmen(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
) -> ApiResponse<Json<reps::ResourceCollection<Salesman>>> {
    Ok(Json(dashboard.list_salesmen()?.into()))
}

async fn create_salesman(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
    Json(data): Json<SalesmanData>,
) -> ApiResponse<(StatusCode, Json<Salesman>)> {
    Ok((StatusCode::CREATED, Json(dashboard.create_salesman(data)?)))
}

async fn delete_salesman(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
    Path(salesman_id): Path<Uuid>,
) -> ApiResponse<StatusCode> {
    dashboard.delete_salesman(salesman_id)?;

    Ok(StatusCode::NO_CONTENT)
}

async fn list_reminders(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
) -> ApiResponse<Json<reps::ResourceCollection<Reminder>>> {
    Ok(Json(dashboard.list_reminders()?.into()))
}

async fn record_reminder(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
    Json(data): Json<ReminderData>,
) -> ApiResponse<(StatusCode, Json<Reminder>)> {
    Ok((StatusCode::CREATED, Json(dashboard.record_reminder(data)?)))
}

async fn due_for_delivery(
    _: ActiveSession,
    State(dashboard): State<DashboardService>,
) -> ApiResponse<Json<reps::ResourceCollection<reps::DueCustomer>>> {
    let due = dashboard.due_for_delivery()?;

    Ok(Json(
        due.into_iter()
            .map(reps::DueCustomer::from)
            .collect::<Vec<_>>()
            .into(),
    ))
}
