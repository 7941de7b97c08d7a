use std::sync::Arc;

use crate::{
    dashboard::models::{Customer, InventoryItem, Reminder, Sale, Salesman},
    storage::{keys, RecordStore, StorageError},
};

pub type DynDashboardRepo = Arc<dyn DashboardRepo + Send + Sync>;

/// Persistence for the dashboard collections.
///
/// Each collection is loaded and saved as a whole.
pub trait DashboardRepo {
    fn customers(&self) -> Result<Vec<Customer>, StorageError>;
    fn save_customers(&self, customers: &[Customer]) -> Result<(), StorageError>;

    fn sales(&self) -> Result<Vec<Sale>, StorageError>;
    fn save_sales(&self, sales: &[Sale]) -> Result<(), StorageError>;

    fn inventory(&self) -> Result<Vec<InventoryItem>, StorageError>;
    fn save_inventory(&self, items: &[InventoryItem]) -> Result<(), StorageError>;

    fn salesmen(&self) -> Result<Vec<Salesman>, StorageError>;
    fn save_salesmen(&self, salesmen: &[Salesman]) -> Result<(), StorageError>;

    fn reminders(&self) -> Result<Vec<Reminder>, StorageError>;
    fn save_reminders(&self, reminders: &[Reminder]) -> Result<(), StorageError>;
}

impl DashboardRepo for RecordStore {
    fn customers(&self) -> Result<Vec<Customer>, StorageError> {
        self.read_collection(keys::CUSTOMERS)
    }

    fn save_customers(&self, customers: &[Customer]) -> Result<(), StorageError> {
        Ok(self.write(keys::CUSTOMERS, &customers)?)
    }

    fn sales(&self) -> Result<Vec<Sale>, StorageError> {
        self.read_collection(keys::SALES)
    }

    fn save_sales(&self, sales: &[Sale]) -> Result<(), StorageError> {
        Ok(self.write(keys::SALES, &sales)?)
    }

    fn inventory(&self) -> Result<Vec<InventoryItem>, StorageError> {
        self.read_collection(keys::INVENTORY)
    }

    fn save_inventory(&self, items: &[InventoryItem]) -> Result<(), StorageError> {
        Ok(self.write(keys::INVENTORY, &items)?)
    }

    fn salesmen(&self) -> Result<Vec<Salesman>, StorageError> {
        self.read_collection(keys::SALESMEN)
    }

    fn save_salesmen(&self, salesmen: &[Salesman]) -> Result<(), StorageError> {
        Ok(self.write(keys::SALESMEN, &salesmen)?)
    }

    fn reminders(&self) -> Result<Vec<Reminder>, StorageError> {
        self.read_collection(keys::REMINDERS)
    }

    fn save_reminders(&self, reminders: &[Reminder]) -> Result<(), StorageError> {
        Ok(self.write(keys::REMINDERS, &reminders)?)
    }
}
