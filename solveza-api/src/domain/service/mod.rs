//! 领域服务

pub mod account_balance_service;
pub mod account_validation_service;
pub mod transaction_validation_service;
pub mod user_validation_service;

pub use account_balance_service::AccountBalanceService;
pub use account_validation_service::AccountValidationService;
pub use transaction_validation_service::TransactionValidationService;
pub use user_validation_service::UserValidationService;
