pub mod authentication;
pub mod cli;
pub mod clock;
mod cors;
pub mod dashboard;
pub mod http_err;
pub mod ledger;
pub mod passwords;
pub mod rate_limit;
pub mod repos;
pub mod server;
pub mod storage;
pub mod validation;
