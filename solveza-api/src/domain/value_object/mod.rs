//! 值对象

pub mod identifiers;
pub mod money;
pub mod provider;

pub use identifiers::{AccountId, PermissionId, RoleId, TransactionId, UserId};
pub use money::{Currency, Money};
pub use provider::Provider;
