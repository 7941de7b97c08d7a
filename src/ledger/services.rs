use thiserror::Error;
use uuid::Uuid;

use crate::{
    clock::DynClock, dashboard::models::Customer, repos::DynDashboardRepo, storage::StorageError,
};

use super::domain::statement::Statement;

#[derive(Debug, Error)]
pub enum StatementError {
    #[error("no customer with ID {0}")]
    CustomerNotFound(Uuid),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A customer together with their reconciled account statement.
#[derive(Clone, Debug)]
pub struct CustomerStatement {
    pub customer: Customer,
    pub statement: Statement,
}

#[derive(Clone)]
pub struct LedgerService {
    repo: DynDashboardRepo,
    clock: DynClock,
}

impl LedgerService {
    pub fn new(repo: DynDashboardRepo, clock: DynClock) -> Self {
        Self { repo, clock }
    }

    /// Build the account statement for a customer from their recorded sales
    /// and payments.
    pub fn customer_statement(
        &self,
        customer_id: Uuid,
    ) -> Result<CustomerStatement, StatementError> {
        let customer = self
            .repo
            .customers()?
            .into_iter()
            .find(|customer| customer.id == customer_id)
            .ok_or(StatementError::CustomerNotFound(customer_id))?;

        let mut sales = self.repo.sales()?;
        sales.retain(|sale| sale.customer_id == customer_id);

        let inventory = self.repo.inventory()?;

        let statement =
            Statement::build(customer.total_balance, &sales, &inventory, self.clock.now());

        Ok(CustomerStatement {
            customer,
            statement,
        })
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use crate::{
        clock::ManualClock,
        dashboard::models::{InventoryItem, PaymentMethod, Sale},
        ledger::domain::statement::OPENING_ENTRY_ID,
        storage::{keys, KeyValueStore, MemoryStore, RecordStore},
    };

    use super::*;

    fn service() -> (LedgerService, RecordStore) {
        let records = RecordStore::new(Arc::new(MemoryStore::new()));
        let clock = Arc::new(ManualClock::new(Utc.ymd(2024, 6, 1).and_hms(9, 0, 0)));

        (
            LedgerService::new(Arc::new(records.clone()), clock),
            records,
        )
    }

    fn customer(total_balance: i64) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            name: "Green Valley Cafe".to_owned(),
            address: "12 Market Road".to_owned(),
            mobile: "9876543210".to_owned(),
            delivery_frequency_days: 2,
            total_balance,
            empty_bottles_held: 0,
            last_empties_collection_date: None,
            created_at: Utc.ymd(2024, 1, 1).and_hms(0, 0, 0),
        }
    }

    #[test]
    fn statement_only_includes_the_customers_sales() -> anyhow::Result<()> {
        let (service, records) = service();
        let item = InventoryItem {
            id: Uuid::new_v4(),
            name: "20L Water Can".to_owned(),
            unit_price: 50,
            stock: 10,
            created_at: Utc.ymd(2024, 1, 1).and_hms(0, 0, 0),
        };
        let ours = customer(300);
        let theirs = customer(0);
        let sale = |customer_id, day| Sale {
            id: Uuid::new_v4(),
            customer_id,
            salesman_id: None,
            inventory_item_id: Some(item.id),
            quantity: 2,
            amount: 100,
            amount_received: 0,
            empties_collected: 0,
            date: Utc.ymd(2024, 5, day).and_hms(12, 0, 0),
            payment_method: PaymentMethod::Pending,
            description: None,
        };

        records.write(keys::CUSTOMERS, &vec![ours.clone(), theirs.clone()])?;
        records.write(
            keys::SALES,
            &vec![sale(ours.id, 3), sale(theirs.id, 4), sale(ours.id, 5)],
        )?;
        records.write(keys::INVENTORY, &vec![item.clone()])?;

        let CustomerStatement {
            customer,
            statement,
        } = service.customer_statement(ours.id)?;

        assert_eq!(ours, customer);
        assert_eq!(3, statement.entries().len());
        assert_eq!(100, statement.opening_balance());
        assert_eq!(300, statement.closing_balance());
        assert_eq!(
            Utc.ymd(2024, 5, 2).and_hms(12, 0, 0),
            statement.entries()[0].date
        );

        Ok(())
    }

    #[test]
    fn statement_for_customer_without_sales() -> anyhow::Result<()> {
        let (service, records) = service();
        let ours = customer(-80);
        records.write(keys::CUSTOMERS, &vec![ours.clone()])?;

        let CustomerStatement { statement, .. } = service.customer_statement(ours.id)?;

        assert_eq!(1, statement.entries().len());
        assert_eq!(OPENING_ENTRY_ID, statement.entries()[0].id);
        assert_eq!(80, statement.entries()[0].credit);
        assert_eq!(
            Utc.ymd(2024, 6, 1).and_hms(9, 0, 0),
            statement.entries()[0].date
        );

        Ok(())
    }

    #[test]
    fn statement_for_unknown_customer() {
        let (service, _) = service();
        let customer_id = Uuid::new_v4();

        let result = service.customer_statement(customer_id);

        assert!(
            matches!(result, Err(StatementError::CustomerNotFound(id)) if id == customer_id),
            "unexpected result: {:?}",
            result
        );
    }

    #[test]
    fn statement_with_corrupt_sales() -> anyhow::Result<()> {
        let (service, records) = service();
        let ours = customer(0);
        records.write(keys::CUSTOMERS, &vec![ours.clone()])?;
        records.set(keys::SALES, "not json")?;

        let result = service.customer_statement(ours.id);

        assert!(
            matches!(
                result,
                Err(StatementError::Storage(StorageError::Corrupt { .. }))
            ),
            "unexpected result: {:?}",
            result
        );

        Ok(())
    }
}
