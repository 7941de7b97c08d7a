pub mod admin;
pub mod counter;
pub mod email;
pub mod session;
pub mod username;
