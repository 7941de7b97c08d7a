use std::fmt::Debug;

use chrono::{DateTime, Duration, Utc};
use semval::{context::Context, Validate};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    clock::DynClock,
    repos::DynDashboardRepo,
    storage::StorageError,
    validation::{Describe, FieldErrors},
};

use super::{
    domain::{
        customers::{CustomerData, NewCustomerData},
        inventory::InventoryItemData,
        reminders::ReminderData,
        sales::{
            ClearBalanceData, EmptiesCollectionData, PaymentData, SaleData, SaleInvalidity,
            SaleUpdateData,
        },
        salesmen::SalesmanData,
        MAX_AMOUNT,
    },
    models::{Customer, InventoryItem, Reminder, Sale, Salesman},
};

const CLEAR_BALANCE_DESCRIPTION: &str = "Balance cleared";

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("invalid input: {0:?}")]
    Invalid(FieldErrors),

    /// The named kind of record does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl DashboardError {
    fn invalid<V>(context: Context<V>) -> Self
    where
        V: Describe + Debug + 'static,
    {
        Self::Invalid(FieldErrors::from_context(context))
    }

    fn invalidity(invalidity: impl Describe) -> Self {
        let mut errors = FieldErrors::new();
        errors.push(invalidity.field(), invalidity.message());

        Self::Invalid(errors)
    }
}

type DashboardResult<T> = Result<T, DashboardError>;

/// A customer that should receive a delivery.
#[derive(Clone, Debug, PartialEq)]
pub struct DueCustomer {
    pub customer: Customer,
    /// The date of the last product sale, if any.
    pub last_delivery: Option<DateTime<Utc>>,
    /// When the next delivery became due. `None` for customers who have never
    /// received a delivery.
    pub due_since: Option<DateTime<Utc>>,
}

/// A service object providing record keeping for the dashboard.
#[derive(Clone)]
pub struct DashboardService {
    repo: DynDashboardRepo,
    clock: DynClock,
}

impl DashboardService {
    pub fn new(repo: DynDashboardRepo, clock: DynClock) -> Self {
        Self { repo, clock }
    }

    pub fn list_customers(&self) -> DashboardResult<Vec<Customer>> {
        let mut customers = self.repo.customers()?;
        customers.sort_by_key(|customer| customer.name.to_lowercase());

        Ok(customers)
    }

    pub fn get_customer(&self, customer_id: Uuid) -> DashboardResult<Customer> {
        self.repo
            .customers()?
            .into_iter()
            .find(|customer| customer.id == customer_id)
            .ok_or(DashboardError::NotFound("customer"))
    }

    pub fn create_customer(&self, data: NewCustomerData) -> DashboardResult<Customer> {
        data.validate().map_err(DashboardError::invalid)?;

        let customer = Customer {
            id: Uuid::new_v4(),
            name: data.details.name.trim().to_owned(),
            address: data.details.address.trim().to_owned(),
            mobile: data.details.mobile.trim().to_owned(),
            delivery_frequency_days: data.details.delivery_frequency_days,
            total_balance: data.opening_balance,
            empty_bottles_held: data.empty_bottles_held,
            last_empties_collection_date: None,
            created_at: self.clock.now(),
        };

        let mut customers = self.repo.customers()?;
        customers.push(customer.clone());
        self.repo.save_customers(&customers)?;

        info!(customer_id = %customer.id, "Created customer.");

        Ok(customer)
    }

    /// Replace a customer's contact details. Balances are left untouched.
    pub fn update_customer(
        &self,
        customer_id: Uuid,
        data: CustomerData,
    ) -> DashboardResult<Customer> {
        data.validate().map_err(DashboardError::invalid)?;

        let mut customers = self.repo.customers()?;
        let customer = find_mut(&mut customers, |c| c.id == customer_id, "customer")?;

        customer.name = data.name.trim().to_owned();
        customer.address = data.address.trim().to_owned();
        customer.mobile = data.mobile.trim().to_owned();
        customer.delivery_frequency_days = data.delivery_frequency_days;

        let updated = customer.clone();
        self.repo.save_customers(&customers)?;

        Ok(updated)
    }

    /// Delete a customer along with their sales and reminders.
    pub fn delete_customer(&self, customer_id: Uuid) -> DashboardResult<()> {
        let mut customers = self.repo.customers()?;
        let before = customers.len();
        customers.retain(|customer| customer.id != customer_id);
        if customers.len() == before {
            return Err(DashboardError::NotFound("customer"));
        }

        let mut sales = self.repo.sales()?;
        sales.retain(|sale| sale.customer_id != customer_id);
        let mut reminders = self.repo.reminders()?;
        reminders.retain(|reminder| reminder.customer_id != customer_id);

        self.repo.save_sales(&sales)?;
        self.repo.save_reminders(&reminders)?;
        self.repo.save_customers(&customers)?;

        info!(%customer_id, "Deleted customer.");

        Ok(())
    }

    /// List sales newest first, optionally only those of one customer.
    pub fn list_sales(&self, customer_id: Option<Uuid>) -> DashboardResult<Vec<Sale>> {
        let mut sales = self.repo.sales()?;
        if let Some(customer_id) = customer_id {
            sales.retain(|sale| sale.customer_id == customer_id);
        }
        sales.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(sales)
    }

    /// Record a product sale, updating the customer's balance and empties as
    /// well as the item's stock.
    pub fn record_sale(&self, data: SaleData) -> DashboardResult<Sale> {
        data.validate().map_err(DashboardError::invalid)?;
        self.ensure_salesman_exists(data.salesman_id)?;

        let mut customers = self.repo.customers()?;
        let mut inventory = self.repo.inventory()?;

        let item = find_mut(
            &mut inventory,
            |item| item.id == data.inventory_item_id,
            "inventory item",
        )?;
        let quantity = i64::from(data.quantity);
        if quantity > item.stock {
            return Err(DashboardError::invalidity(
                SaleInvalidity::InsufficientStock(item.stock),
            ));
        }

        let customer = find_mut(&mut customers, |c| c.id == data.customer_id, "customer")?;

        let amount = match data.amount {
            Some(amount) => amount,
            None => item
                .unit_price
                .checked_mul(quantity)
                .filter(|amount| *amount <= MAX_AMOUNT)
                .ok_or_else(|| {
                    DashboardError::invalidity(SaleInvalidity::AmountTooLarge(MAX_AMOUNT))
                })?,
        };

        let sale = Sale {
            id: Uuid::new_v4(),
            customer_id: customer.id,
            salesman_id: data.salesman_id,
            inventory_item_id: Some(item.id),
            quantity: data.quantity,
            amount,
            amount_received: data.amount_received,
            empties_collected: data.empties_collected,
            date: data.date.unwrap_or_else(|| self.clock.now()),
            payment_method: data.payment_method,
            description: data.description,
        };

        customer.total_balance = shift_balance(customer.total_balance, sale.net())?;
        item.stock -= quantity;
        customer.empty_bottles_held = adjust_empties(
            customer.empty_bottles_held,
            i64::from(sale.quantity) - i64::from(sale.empties_collected),
        );
        if sale.empties_collected > 0 {
            customer.last_empties_collection_date = Some(sale.date);
        }

        let mut sales = self.repo.sales()?;
        sales.push(sale.clone());

        self.repo.save_sales(&sales)?;
        self.repo.save_customers(&customers)?;
        self.repo.save_inventory(&inventory)?;

        info!(sale_id = %sale.id, customer_id = %sale.customer_id, amount = sale.amount, "Recorded sale.");

        Ok(sale)
    }

    /// Record a payment received from a customer outside of a sale.
    pub fn record_payment(&self, customer_id: Uuid, data: PaymentData) -> DashboardResult<Sale> {
        data.validate().map_err(DashboardError::invalid)?;
        self.ensure_salesman_exists(data.salesman_id)?;

        let payment = Sale {
            id: Uuid::new_v4(),
            customer_id,
            salesman_id: data.salesman_id,
            inventory_item_id: None,
            quantity: 0,
            amount: 0,
            amount_received: data.amount,
            empties_collected: 0,
            date: data.date.unwrap_or_else(|| self.clock.now()),
            payment_method: data.payment_method,
            description: data.description,
        };

        self.apply_balance_entry(payment)
    }

    /// Edit a recorded sale or payment, re-applying the difference to the
    /// customer's balance and empties and to the item's stock.
    pub fn update_sale(&self, sale_id: Uuid, data: SaleUpdateData) -> DashboardResult<Sale> {
        data.validate().map_err(DashboardError::invalid)?;
        self.ensure_salesman_exists(data.salesman_id)?;

        let mut sales = self.repo.sales()?;
        let sale = find_mut(&mut sales, |s| s.id == sale_id, "sale")?;
        let previous = sale.clone();

        if !previous.is_payment() && data.quantity == 0 {
            return Err(DashboardError::invalidity(SaleInvalidity::ZeroQuantity));
        }

        let mut inventory = self.repo.inventory()?;
        if let Some(item_id) = previous.inventory_item_id {
            // The item may have been deleted since the sale was recorded, in
            // which case there is no stock left to adjust.
            if let Some(item) = inventory.iter_mut().find(|item| item.id == item_id) {
                let stock_delta = i64::from(data.quantity) - i64::from(previous.quantity);
                if stock_delta > item.stock {
                    return Err(DashboardError::invalidity(
                        SaleInvalidity::InsufficientStock(item.stock),
                    ));
                }
                item.stock -= stock_delta;
            }
        }

        sale.salesman_id = data.salesman_id;
        sale.quantity = data.quantity;
        sale.amount = data.amount;
        sale.amount_received = data.amount_received;
        sale.empties_collected = data.empties_collected;
        sale.date = data.date;
        sale.payment_method = data.payment_method;
        sale.description = data.description;
        let updated = sale.clone();

        let mut customers = self.repo.customers()?;
        if let Some(customer) = customers.iter_mut().find(|c| c.id == updated.customer_id) {
            customer.total_balance =
                shift_balance(
                customer.total_balance,
                updated.net().saturating_sub(previous.net()),
            )?;

            if !updated.is_payment() {
                let held_delta = (i64::from(updated.quantity) - i64::from(updated.empties_collected))
                    - (i64::from(previous.quantity) - i64::from(previous.empties_collected));
                customer.empty_bottles_held =
                    adjust_empties(customer.empty_bottles_held, held_delta);
            }
        }

        self.repo.save_sales(&sales)?;
        self.repo.save_customers(&customers)?;
        self.repo.save_inventory(&inventory)?;

        info!(%sale_id, "Updated sale.");

        Ok(updated)
    }

    /// Settle a customer's balance to zero.
    ///
    /// A positive balance is recorded as a payment received, a negative one
    /// as a debit. Returns `None` when there was nothing to clear.
    pub fn clear_balance(
        &self,
        customer_id: Uuid,
        data: ClearBalanceData,
    ) -> DashboardResult<Option<Sale>> {
        let customer = self.get_customer(customer_id)?;
        if customer.total_balance == 0 {
            debug!(%customer_id, "Balance already clear.");

            return Ok(None);
        }

        let entry = Sale {
            id: Uuid::new_v4(),
            customer_id,
            salesman_id: None,
            inventory_item_id: None,
            quantity: 0,
            amount: customer.total_balance.saturating_neg().max(0),
            amount_received: customer.total_balance.max(0),
            empties_collected: 0,
            date: data.date.unwrap_or_else(|| self.clock.now()),
            payment_method: data.payment_method,
            description: Some(CLEAR_BALANCE_DESCRIPTION.to_owned()),
        };

        self.apply_balance_entry(entry).map(Some)
    }

    /// Record empty bottles returned by a customer.
    pub fn collect_empties(
        &self,
        customer_id: Uuid,
        data: EmptiesCollectionData,
    ) -> DashboardResult<Customer> {
        data.validate().map_err(DashboardError::invalid)?;

        let mut customers = self.repo.customers()?;
        let customer = find_mut(&mut customers, |c| c.id == customer_id, "customer")?;

        customer.empty_bottles_held =
            adjust_empties(customer.empty_bottles_held, -i64::from(data.count));
        customer.last_empties_collection_date = Some(data.date.unwrap_or_else(|| self.clock.now()));

        let updated = customer.clone();
        self.repo.save_customers(&customers)?;

        Ok(updated)
    }

    pub fn list_inventory(&self) -> DashboardResult<Vec<InventoryItem>> {
        let mut items = self.repo.inventory()?;
        items.sort_by_key(|item| item.name.to_lowercase());

        Ok(items)
    }

    pub fn create_inventory_item(&self, data: InventoryItemData) -> DashboardResult<InventoryItem> {
        data.validate().map_err(DashboardError::invalid)?;

        let item = InventoryItem {
            id: Uuid::new_v4(),
            name: data.name.trim().to_owned(),
            unit_price: data.unit_price,
            stock: data.stock,
            created_at: self.clock.now(),
        };

        let mut items = self.repo.inventory()?;
        items.push(item.clone());
        self.repo.save_inventory(&items)?;

        Ok(item)
    }

    pub fn update_inventory_item(
        &self,
        item_id: Uuid,
        data: InventoryItemData,
    ) -> DashboardResult<InventoryItem> {
        data.validate().map_err(DashboardError::invalid)?;

        let mut items = self.repo.inventory()?;
        let item = find_mut(&mut items, |i| i.id == item_id, "inventory item")?;

        item.name = data.name.trim().to_owned();
        item.unit_price = data.unit_price;
        item.stock = data.stock;

        let updated = item.clone();
        self.repo.save_inventory(&items)?;

        Ok(updated)
    }

    /// Delete an inventory item. Sales of the item are kept and show up as
    /// an unknown item on statements.
    pub fn delete_inventory_item(&self, item_id: Uuid) -> DashboardResult<()> {
        let mut items = self.repo.inventory()?;
        let before = items.len();
        items.retain(|item| item.id != item_id);
        if items.len() == before {
            return Err(DashboardError::NotFound("inventory item"));
        }

        self.repo.save_inventory(&items)?;

        Ok(())
    }

    pub fn list_salesmen(&self) -> DashboardResult<Vec<Salesman>> {
        let mut salesmen = self.repo.salesmen()?;
        salesmen.sort_by_key(|salesman| salesman.name.to_lowercase());

        Ok(salesmen)
    }

    pub fn create_salesman(&self, data: SalesmanData) -> DashboardResult<Salesman> {
        data.validate().map_err(DashboardError::invalid)?;

        let salesman = Salesman {
            id: Uuid::new_v4(),
            name: data.name.trim().to_owned(),
            mobile: data.mobile.trim().to_owned(),
            created_at: self.clock.now(),
        };

        let mut salesmen = self.repo.salesmen()?;
        salesmen.push(salesman.clone());
        self.repo.save_salesmen(&salesmen)?;

        Ok(salesman)
    }

    pub fn delete_salesman(&self, salesman_id: Uuid) -> DashboardResult<()> {
        let mut salesmen = self.repo.salesmen()?;
        let before = salesmen.len();
        salesmen.retain(|salesman| salesman.id != salesman_id);
        if salesmen.len() == before {
            return Err(DashboardError::NotFound("salesman"));
        }

        self.repo.save_salesmen(&salesmen)?;

        Ok(())
    }

    /// The reminder history, newest first.
    pub fn list_reminders(&self) -> DashboardResult<Vec<Reminder>> {
        let mut reminders = self.repo.reminders()?;
        reminders.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));

        Ok(reminders)
    }

    pub fn record_reminder(&self, data: ReminderData) -> DashboardResult<Reminder> {
        data.validate().map_err(DashboardError::invalid)?;
        let customer = self.get_customer(data.customer_id)?;

        let reminder = Reminder {
            id: Uuid::new_v4(),
            customer_id: customer.id,
            message: data.message.trim().to_owned(),
            sent_at: self.clock.now(),
        };

        let mut reminders = self.repo.reminders()?;
        reminders.push(reminder.clone());
        self.repo.save_reminders(&reminders)?;

        info!(reminder_id = %reminder.id, customer_id = %customer.id, "Recorded reminder.");

        Ok(reminder)
    }

    /// Customers whose next delivery is due, most overdue first. Customers
    /// who have never had a delivery come first.
    pub fn due_for_delivery(&self) -> DashboardResult<Vec<DueCustomer>> {
        let now = self.clock.now();
        let sales = self.repo.sales()?;

        let mut due: Vec<DueCustomer> = self
            .repo
            .customers()?
            .into_iter()
            .filter_map(|customer| {
                let last_delivery = sales
                    .iter()
                    .filter(|sale| sale.customer_id == customer.id && !sale.is_payment())
                    .map(|sale| sale.date)
                    .max();
                let due_since = match last_delivery {
                    Some(last) => {
                        let interval = Duration::days(i64::from(customer.delivery_frequency_days));
                        match last.checked_add_signed(interval) {
                            Some(due_at) if due_at <= now => Some(due_at),
                            // Not due yet, or not due before the end of the calendar.
                            _ => return None,
                        }
                    }
                    None => None,
                };

                Some(DueCustomer {
                    customer,
                    last_delivery,
                    due_since,
                })
            })
            .collect();

        // `None` sorts before any date.
        due.sort_by_key(|entry| entry.due_since);

        Ok(due)
    }

    fn apply_balance_entry(&self, entry: Sale) -> DashboardResult<Sale> {
        let mut customers = self.repo.customers()?;
        let customer = find_mut(&mut customers, |c| c.id == entry.customer_id, "customer")?;
        customer.total_balance = shift_balance(customer.total_balance, entry.net())?;

        let mut sales = self.repo.sales()?;
        sales.push(entry.clone());

        self.repo.save_sales(&sales)?;
        self.repo.save_customers(&customers)?;

        info!(
            sale_id = %entry.id,
            customer_id = %entry.customer_id,
            debit = entry.amount,
            credit = entry.amount_received,
            "Recorded balance entry."
        );

        Ok(entry)
    }

    fn ensure_salesman_exists(&self, salesman_id: Option<Uuid>) -> DashboardResult<()> {
        match salesman_id {
            Some(id) if !self.repo.salesmen()?.iter().any(|s| s.id == id) => {
                Err(DashboardError::NotFound("salesman"))
            }
            _ => Ok(()),
        }
    }
}

fn find_mut<'a, T>(
    records: &'a mut [T],
    predicate: impl Fn(&T) -> bool,
    kind: &'static str,
) -> DashboardResult<&'a mut T> {
    records
        .iter_mut()
        .find(|record| predicate(record))
        .ok_or(DashboardError::NotFound(kind))
}

fn shift_balance(balance: i64, delta: i64) -> DashboardResult<i64> {
    balance
        .checked_add(delta)
        .ok_or_else(|| DashboardError::invalidity(SaleInvalidity::BalanceOutOfRange))
}

fn adjust_empties(held: u32, delta: i64) -> u32 {
    let adjusted = (i64::from(held) + delta).max(0);

    u32::try_from(adjusted).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use chrono::TimeZone;

    use crate::{
        clock::{Clock, ManualClock},
        dashboard::{domain::customers::CustomerData, models::PaymentMethod},
        storage::{MemoryStore, RecordStore},
    };

    use super::*;

    struct Fixture {
        service: DashboardService,
        repo: DynDashboardRepo,
        clock: Arc<ManualClock>,
    }

    impl Fixture {
        fn new() -> Self {
            let clock = Arc::new(ManualClock::new(Utc.ymd(2024, 5, 1).and_hms(8, 0, 0)));
            let repo: DynDashboardRepo = Arc::new(RecordStore::new(Arc::new(MemoryStore::new())));

            Self {
                service: DashboardService::new(repo.clone(), clock.clone()),
                repo,
                clock,
            }
        }

        fn customer(&self, name: &str, opening_balance: i64) -> Customer {
            self.service
                .create_customer(NewCustomerData {
                    details: CustomerData {
                        name: name.to_owned(),
                        address: "12 Market Road".to_owned(),
                        mobile: "9876543210".to_owned(),
                        delivery_frequency_days: 3,
                    },
                    opening_balance,
                    empty_bottles_held: 0,
                })
                .expect("customer should be created")
        }

        fn item(&self, stock: i64) -> InventoryItem {
            self.priced_item(50, stock)
        }

        fn priced_item(&self, unit_price: i64, stock: i64) -> InventoryItem {
            self.service
                .create_inventory_item(InventoryItemData {
                    name: "20L Water Can".to_owned(),
                    unit_price,
                    stock,
                })
                .expect("item should be created")
        }

        /// Overwrite a stored customer, bypassing validation.
        fn store_customer(&self, customer: Customer) {
            let mut customers = self.repo.customers().expect("customers should load");
            for stored in customers.iter_mut().filter(|c| c.id == customer.id) {
                *stored = customer.clone();
            }
            self.repo
                .save_customers(&customers)
                .expect("customers should save");
        }

        fn sale(&self, customer: &Customer, item: &InventoryItem, quantity: u32) -> SaleData {
            SaleData {
                customer_id: customer.id,
                salesman_id: None,
                inventory_item_id: item.id,
                quantity,
                amount: None,
                amount_received: 0,
                empties_collected: 0,
                date: None,
                payment_method: PaymentMethod::Pending,
                description: None,
            }
        }
    }

    #[test]
    fn create_customer_validates() {
        let fixture = Fixture::new();

        let error = fixture
            .service
            .create_customer(NewCustomerData {
                details: CustomerData {
                    name: "".to_owned(),
                    address: "somewhere".to_owned(),
                    mobile: "9876543210".to_owned(),
                    delivery_frequency_days: 1,
                },
                opening_balance: 0,
                empty_bottles_held: 0,
            })
            .expect_err("customer should be invalid");

        match error {
            DashboardError::Invalid(errors) => {
                assert_eq!(vec!["Name is required.".to_owned()], errors.messages("name"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn record_sale_updates_balance_stock_and_empties() -> anyhow::Result<()> {
        let fixture = Fixture::new();
        let customer = fixture.customer("Green Valley Cafe", 100);
        let item = fixture.item(10);

        let sale = fixture.service.record_sale(SaleData {
            amount_received: 50,
            empties_collected: 1,
            ..fixture.sale(&customer, &item, 4)
        })?;

        assert_eq!(200, sale.amount, "amount defaults to price times quantity");

        let customer = fixture.service.get_customer(customer.id)?;
        assert_eq!(100 + 200 - 50, customer.total_balance);
        assert_eq!(3, customer.empty_bottles_held);
        assert_eq!(Some(sale.date), customer.last_empties_collection_date);

        let items = fixture.service.list_inventory()?;
        assert_eq!(6, items[0].stock);

        Ok(())
    }

    fn assert_invalid(error: DashboardError, field: &str, message: &str) {
        match error {
            DashboardError::Invalid(errors) => {
                assert_eq!(vec![message.to_owned()], errors.messages(field))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn record_sale_rejects_default_amount_out_of_range() -> anyhow::Result<()> {
        let fixture = Fixture::new();
        let customer = fixture.customer("Green Valley Cafe", 0);
        let item = fixture.priced_item(MAX_AMOUNT, 10);

        let error = fixture
            .service
            .record_sale(fixture.sale(&customer, &item, 3))
            .expect_err("sale should be rejected");

        assert_invalid(
            error,
            "amount",
            &format!("Amount may not exceed {}.", MAX_AMOUNT),
        );
        assert_eq!(0, fixture.service.get_customer(customer.id)?.total_balance);
        assert_eq!(10, fixture.service.list_inventory()?[0].stock);
        assert!(fixture.service.list_sales(None)?.is_empty());

        Ok(())
    }

    #[test]
    fn balance_entries_may_not_overflow() -> anyhow::Result<()> {
        let fixture = Fixture::new();
        let customer = fixture.customer("Green Valley Cafe", 0);
        fixture.store_customer(Customer {
            total_balance: i64::MAX - 10,
            ..customer.clone()
        });
        let item = fixture.item(10);

        let error = fixture
            .service
            .record_sale(fixture.sale(&customer, &item, 1))
            .expect_err("sale should be rejected");

        assert_invalid(
            error,
            "amount",
            "This entry would take the customer's balance out of range.",
        );
        assert_eq!(
            i64::MAX - 10,
            fixture.service.get_customer(customer.id)?.total_balance
        );
        assert_eq!(10, fixture.service.list_inventory()?[0].stock);

        fixture.store_customer(Customer {
            total_balance: i64::MIN + 10,
            ..customer.clone()
        });
        let error = fixture
            .service
            .record_payment(
                customer.id,
                PaymentData {
                    amount: 100,
                    payment_method: PaymentMethod::Cash,
                    salesman_id: None,
                    date: None,
                    description: None,
                },
            )
            .expect_err("payment should be rejected");

        assert!(matches!(error, DashboardError::Invalid(_)));
        assert!(fixture.service.list_sales(None)?.is_empty());

        Ok(())
    }

    #[test]
    fn record_sale_rejects_overselling() {
        let fixture = Fixture::new();
        let customer = fixture.customer("Green Valley Cafe", 0);
        let item = fixture.item(2);

        let error = fixture
            .service
            .record_sale(fixture.sale(&customer, &item, 3))
            .expect_err("sale should be rejected");

        match error {
            DashboardError::Invalid(errors) => {
                assert_eq!(vec!["Only 2 left in stock.".to_owned()], errors.messages("quantity"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn record_sale_for_unknown_customer() {
        let fixture = Fixture::new();
        let ghost = Customer {
            id: Uuid::new_v4(),
            ..fixture.customer("Real", 0)
        };
        let item = fixture.item(5);

        let error = fixture
            .service
            .record_sale(fixture.sale(&ghost, &item, 1))
            .expect_err("sale should be rejected");

        assert!(matches!(error, DashboardError::NotFound("customer")));
    }

    #[test]
    fn record_sale_with_unknown_salesman() {
        let fixture = Fixture::new();
        let customer = fixture.customer("Green Valley Cafe", 0);
        let item = fixture.item(5);

        let error = fixture
            .service
            .record_sale(SaleData {
                salesman_id: Some(Uuid::new_v4()),
                ..fixture.sale(&customer, &item, 1)
            })
            .expect_err("sale should be rejected");

        assert!(matches!(error, DashboardError::NotFound("salesman")));
    }

    #[test]
    fn payment_reduces_balance() -> anyhow::Result<()> {
        let fixture = Fixture::new();
        let customer = fixture.customer("Green Valley Cafe", 500);

        let payment = fixture.service.record_payment(
            customer.id,
            PaymentData {
                amount: 200,
                payment_method: PaymentMethod::Bank,
                salesman_id: None,
                date: None,
                description: None,
            },
        )?;

        assert!(payment.is_payment());
        assert_eq!(300, fixture.service.get_customer(customer.id)?.total_balance);

        Ok(())
    }

    #[test]
    fn update_sale_reapplies_differences() -> anyhow::Result<()> {
        let fixture = Fixture::new();
        let customer = fixture.customer("Green Valley Cafe", 0);
        let item = fixture.item(10);
        let sale = fixture
            .service
            .record_sale(fixture.sale(&customer, &item, 2))?;

        let updated = fixture.service.update_sale(
            sale.id,
            SaleUpdateData {
                salesman_id: None,
                quantity: 5,
                amount: 250,
                amount_received: 100,
                empties_collected: 2,
                date: sale.date,
                payment_method: PaymentMethod::Cash,
                description: None,
            },
        )?;

        assert_eq!(5, updated.quantity);
        let customer = fixture.service.get_customer(customer.id)?;
        assert_eq!(150, customer.total_balance);
        assert_eq!(3, customer.empty_bottles_held);
        assert_eq!(5, fixture.service.list_inventory()?[0].stock);

        Ok(())
    }

    #[test]
    fn update_missing_sale() {
        let fixture = Fixture::new();

        let error = fixture
            .service
            .update_sale(
                Uuid::new_v4(),
                SaleUpdateData {
                    salesman_id: None,
                    quantity: 1,
                    amount: 1,
                    amount_received: 0,
                    empties_collected: 0,
                    date: fixture.clock.now(),
                    payment_method: PaymentMethod::Cash,
                    description: None,
                },
            )
            .expect_err("update should fail");

        assert!(matches!(error, DashboardError::NotFound("sale")));
    }

    fn cash_clear() -> ClearBalanceData {
        ClearBalanceData {
            payment_method: PaymentMethod::Cash,
            date: None,
        }
    }

    #[test]
    fn clear_balance_records_balancing_entry() -> anyhow::Result<()> {
        let fixture = Fixture::new();
        let owes = fixture.customer("Owes Money", 400);
        let in_credit = fixture.customer("In Credit", -150);
        let settled = fixture.customer("Settled", 0);

        let payment = fixture
            .service
            .clear_balance(owes.id, cash_clear())?
            .expect("entry should be recorded");
        assert_eq!((0, 400), (payment.amount, payment.amount_received));

        let debit = fixture
            .service
            .clear_balance(in_credit.id, cash_clear())?
            .expect("entry should be recorded");
        assert_eq!((150, 0), (debit.amount, debit.amount_received));

        assert_eq!(
            None,
            fixture
                .service
                .clear_balance(settled.id, cash_clear())?
        );

        for customer in fixture.service.list_customers()? {
            assert_eq!(0, customer.total_balance, "{} not cleared", customer.name);
        }

        Ok(())
    }

    #[test]
    fn collect_empties_never_goes_negative() -> anyhow::Result<()> {
        let fixture = Fixture::new();
        let customer = fixture.customer("Green Valley Cafe", 0);
        let item = fixture.item(10);
        fixture
            .service
            .record_sale(fixture.sale(&customer, &item, 2))?;

        let customer = fixture.service.collect_empties(
            customer.id,
            EmptiesCollectionData {
                count: 5,
                date: None,
            },
        )?;

        assert_eq!(0, customer.empty_bottles_held);
        assert_eq!(
            Some(fixture.clock.now()),
            customer.last_empties_collection_date
        );

        Ok(())
    }

    #[test]
    fn delete_customer_removes_history() -> anyhow::Result<()> {
        let fixture = Fixture::new();
        let customer = fixture.customer("Green Valley Cafe", 0);
        let other = fixture.customer("Hilltop School", 0);
        let item = fixture.item(10);
        fixture
            .service
            .record_sale(fixture.sale(&customer, &item, 1))?;
        fixture
            .service
            .record_sale(fixture.sale(&other, &item, 1))?;
        fixture.service.record_reminder(ReminderData {
            customer_id: customer.id,
            message: "Delivery tomorrow".to_owned(),
        })?;

        fixture.service.delete_customer(customer.id)?;

        assert!(matches!(
            fixture.service.get_customer(customer.id),
            Err(DashboardError::NotFound("customer"))
        ));
        let sales = fixture.service.list_sales(None)?;
        assert_eq!(1, sales.len());
        assert_eq!(other.id, sales[0].customer_id);
        assert!(fixture.service.list_reminders()?.is_empty());

        Ok(())
    }

    #[test]
    fn due_for_delivery() -> anyhow::Result<()> {
        let fixture = Fixture::new();
        let never_delivered = fixture.customer("Never Delivered", 0);
        let recent = fixture.customer("Recent", 0);
        let overdue = fixture.customer("Overdue", 0);
        let item = fixture.item(10);

        fixture.service.record_sale(SaleData {
            date: Some(fixture.clock.now() - Duration::days(5)),
            ..fixture.sale(&overdue, &item, 1)
        })?;
        fixture.service.record_sale(SaleData {
            date: Some(fixture.clock.now() - Duration::days(1)),
            ..fixture.sale(&recent, &item, 1)
        })?;

        let due = fixture.service.due_for_delivery()?;
        let names = due
            .iter()
            .map(|entry| entry.customer.name.as_str())
            .collect::<Vec<_>>();

        assert_eq!(vec!["Never Delivered", "Overdue"], names);
        assert_eq!(never_delivered.id, due[0].customer.id);
        assert_eq!(
            Some(fixture.clock.now() - Duration::days(2)),
            due[1].due_since
        );

        Ok(())
    }

    #[test]
    fn create_customer_caps_delivery_frequency() {
        let fixture = Fixture::new();

        let error = fixture
            .service
            .create_customer(NewCustomerData {
                details: CustomerData {
                    name: "Far Away Farm".to_owned(),
                    address: "End of the road".to_owned(),
                    mobile: "9876543210".to_owned(),
                    delivery_frequency_days: u32::MAX,
                },
                opening_balance: 0,
                empty_bottles_held: 0,
            })
            .expect_err("customer should be invalid");

        assert_invalid(
            error,
            "delivery_frequency_days",
            "Delivery frequency may not exceed 365 days.",
        );
    }

    #[test]
    fn stored_frequency_past_the_calendar_is_never_due() -> anyhow::Result<()> {
        let fixture = Fixture::new();
        let customer = fixture.customer("Far Away Farm", 0);
        let item = fixture.item(10);
        fixture
            .service
            .record_sale(fixture.sale(&customer, &item, 1))?;
        fixture.store_customer(Customer {
            delivery_frequency_days: u32::MAX,
            ..customer
        });

        assert!(fixture.service.due_for_delivery()?.is_empty());

        Ok(())
    }

    #[test]
    fn reminders_are_listed_newest_first() -> anyhow::Result<()> {
        let fixture = Fixture::new();
        let customer = fixture.customer("Green Valley Cafe", 0);

        let first = fixture.service.record_reminder(ReminderData {
            customer_id: customer.id,
            message: "Payment due".to_owned(),
        })?;
        fixture.clock.advance(Duration::hours(1));
        let second = fixture.service.record_reminder(ReminderData {
            customer_id: customer.id,
            message: "Second notice".to_owned(),
        })?;

        let ids = fixture
            .service
            .list_reminders()?
            .into_iter()
            .map(|reminder| reminder.id)
            .collect::<Vec<_>>();

        assert_eq!(vec![second.id, first.id], ids);

        Ok(())
    }

    #[test]
    fn reminder_for_unknown_customer() {
        let fixture = Fixture::new();

        let error = fixture
            .service
            .record_reminder(ReminderData {
                customer_id: Uuid::new_v4(),
                message: "Hello".to_owned(),
            })
            .expect_err("reminder should be rejected");

        assert!(matches!(error, DashboardError::NotFound("customer")));
    }
}
