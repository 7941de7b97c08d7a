use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::ledger::{domain::statement, services::CustomerStatement};

#[derive(Serialize)]
pub struct StatementEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub debit: i64,
    pub credit: i64,
    pub balance: i64,
}

impl From<&statement::StatementEntry> for StatementEntry {
    fn from(entry: &statement::StatementEntry) -> Self {
        Self {
            id: entry.id.clone(),
            date: entry.date,
            description: entry.description.clone(),
            debit: entry.debit,
            credit: entry.credit,
            balance: entry.balance,
        }
    }
}

#[derive(Serialize)]
pub struct Statement {
    pub customer_id: Uuid,
    pub customer_name: String,
    pub opening_balance: i64,
    pub closing_balance: i64,
    /// Oldest first, as the running balance accumulates.
    pub entries: Vec<StatementEntry>,
    /// Newest first.
    pub display: Vec<StatementEntry>,
}

impl From<&CustomerStatement> for Statement {
    fn from(CustomerStatement { customer, statement }: &CustomerStatement) -> Self {
        Self {
            customer_id: customer.id,
            customer_name: customer.name.clone(),
            opening_balance: statement.opening_balance(),
            closing_balance: statement.closing_balance(),
            entries: statement.entries().iter().map(StatementEntry::from).collect(),
            display: statement
                .newest_first()
                .iter()
                .map(StatementEntry::from)
                .collect(),
        }
    }
}
