use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::dashboard::models::{InventoryItem, Sale};

/// Identifier of the synthetic opening balance entry.
pub const OPENING_ENTRY_ID: &str = "opening-balance";
const OPENING_DESCRIPTION: &str = "Opening Balance";
const UNKNOWN_ITEM: &str = "Unknown Item";

/// One row of a customer's account statement.
#[derive(Clone, Debug, PartialEq)]
pub struct StatementEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub debit: i64,
    pub credit: i64,
    /// The balance after this entry is applied.
    pub balance: i64,
}

/// A customer's account history reconciled against their stored balance.
///
/// The stored balance is treated as correct. Whatever part of it is not
/// explained by the recorded sales and payments is attributed to an opening
/// balance, so the final running balance always equals the stored one.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    opening_balance: i64,
    entries: Vec<StatementEntry>,
}

impl Statement {
    /// Build a statement.
    ///
    /// # Arguments
    ///
    /// * `total_balance` - The customer's stored running balance.
    /// * `sales` - The customer's sales and payments, in any order.
    /// * `inventory` - Used to name the items in sale descriptions.
    /// * `now` - The date given to an opening entry when there are no sales.
    pub fn build(
        total_balance: i64,
        sales: &[Sale],
        inventory: &[InventoryItem],
        now: DateTime<Utc>,
    ) -> Self {
        let mut ordered: Vec<&Sale> = sales.iter().collect();
        ordered.sort_by_key(|sale| sale.date);

        // Stored amounts are not range checked here; sums saturate.
        let recorded_net = ordered
            .iter()
            .fold(0i64, |net, sale| net.saturating_add(sale.net()));
        let opening_balance = total_balance.saturating_sub(recorded_net);

        let item_names: HashMap<Uuid, &str> = inventory
            .iter()
            .map(|item| (item.id, item.name.as_str()))
            .collect();

        let mut entries = Vec::with_capacity(ordered.len() + 1);

        match ordered.first() {
            Some(first) => entries.push(opening_entry(
                opening_balance,
                first.date - Duration::days(1),
            )),
            None if opening_balance != 0 => entries.push(opening_entry(opening_balance, now)),
            None => (),
        }

        let mut balance = opening_balance;
        for sale in ordered {
            balance = balance.saturating_add(sale.net());

            entries.push(StatementEntry {
                id: sale.id.to_string(),
                date: sale.date,
                description: describe(sale, &item_names),
                debit: sale.amount,
                credit: sale.amount_received,
                balance,
            });
        }

        Self {
            opening_balance,
            entries,
        }
    }

    pub fn opening_balance(&self) -> i64 {
        self.opening_balance
    }

    /// Entries ordered oldest first.
    pub fn entries(&self) -> &[StatementEntry] {
        &self.entries
    }

    /// Entries ordered newest first, for display.
    pub fn newest_first(&self) -> Vec<StatementEntry> {
        self.entries.iter().rev().cloned().collect()
    }

    pub fn closing_balance(&self) -> i64 {
        self.entries
            .last()
            .map(|entry| entry.balance)
            .unwrap_or(self.opening_balance)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn opening_entry(opening_balance: i64, date: DateTime<Utc>) -> StatementEntry {
    StatementEntry {
        id: OPENING_ENTRY_ID.to_owned(),
        date,
        description: OPENING_DESCRIPTION.to_owned(),
        debit: opening_balance.max(0),
        credit: opening_balance.saturating_neg().max(0),
        balance: opening_balance,
    }
}

fn describe(sale: &Sale, item_names: &HashMap<Uuid, &str>) -> String {
    if let Some(description) = sale.description.as_deref() {
        if !description.trim().is_empty() {
            return description.to_owned();
        }
    }

    match sale.inventory_item_id {
        Some(item_id) => format!(
            "Sale: {} x {}",
            item_names.get(&item_id).copied().unwrap_or(UNKNOWN_ITEM),
            sale.quantity
        ),
        None => format!("Payment Received ({})", sale.payment_method),
    }
}
