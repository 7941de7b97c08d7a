//! Day-to-day records of the delivery business: customers, sales and
//! payments, inventory, salesmen and delivery reminders.

pub mod domain;
pub mod http;
pub mod models;
pub mod services;
