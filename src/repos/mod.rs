mod dashboard;

pub use dashboard::{DashboardRepo, DynDashboardRepo};
