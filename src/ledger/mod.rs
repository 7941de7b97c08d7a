//! Customer account statements.

pub mod domain;
pub mod http;
pub mod services;
