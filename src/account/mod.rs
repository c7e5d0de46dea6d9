//! Account profiles

pub mod models;
pub mod service;

pub use models::Account;
pub use service::AccountService;
