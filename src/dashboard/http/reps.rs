use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dashboard::{models::Customer, services};

#[derive(Serialize)]
pub struct ResourceCollection<T: Serialize> {
    pub items: Vec<T>,
}

impl<T: Serialize> From<Vec<T>> for ResourceCollection<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

#[derive(Deserialize)]
pub struct SalesParams {
    pub customer_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct DueCustomer {
    pub customer: Customer,
    pub last_delivery: Option<DateTime<Utc>>,
    pub due_since: Option<DateTime<Utc>>,
}

impl From<services::DueCustomer> for DueCustomer {
    fn from(due: services::DueCustomer) -> Self {
        Self {
            customer: due.customer,
            last_delivery: due.last_delivery,
            due_since: due.due_since,
        }
    }
}
