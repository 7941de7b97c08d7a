//! Access to the console.
//!
//! An administrator registers and logs in with email and password. The sales
//! counter uses a shared username and password, protected by a lockout after
//! repeated failures, and receives a time-boxed session.

pub mod domain;
pub mod http;
pub mod models;
pub mod services;
