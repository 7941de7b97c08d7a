//! Persisted dashboard records.
//!
//! Amounts are whole numbers in the currency's minor units.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub mobile: String,
    pub delivery_frequency_days: u32,
    /// Running balance owed by the customer. Positive means the customer owes
    /// money.
    pub total_balance: i64,
    pub empty_bottles_held: u32,
    pub last_empties_collection_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PaymentMethod {
    Cash,
    Bank,
    Pending,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cash => "Cash",
            Self::Bank => "Bank",
            Self::Pending => "Pending",
        };

        f.write_str(name)
    }
}

/// A product sale, or a standalone payment when `inventory_item_id` is not
/// set.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Sale {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub salesman_id: Option<Uuid>,
    pub inventory_item_id: Option<Uuid>,
    pub quantity: u32,
    pub amount: i64,
    pub amount_received: i64,
    pub empties_collected: u32,
    pub date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub description: Option<String>,
}

impl Sale {
    pub fn is_payment(&self) -> bool {
        self.inventory_item_id.is_none()
    }

    /// The change this record makes to the customer's balance.
    pub fn net(&self) -> i64 {
        self.amount.saturating_sub(self.amount_received)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    pub unit_price: i64,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Salesman {
    pub id: Uuid,
    pub name: String,
    pub mobile: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Reminder {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub message: String,
    pub sent_at: DateTime<Utc>,
}
