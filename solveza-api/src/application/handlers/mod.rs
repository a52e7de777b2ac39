//! 命令与查询处理器

pub mod account;
pub mod permission;
pub mod role;
pub mod transaction;
pub mod user;

pub use account::{AccountCommandHandler, AccountQueryHandler};
pub use permission::{PermissionCommandHandler, PermissionQueryHandler};
pub use role::{RoleCommandHandler, RoleQueryHandler};
pub use transaction::{TransactionCommandHandler, TransactionQueryHandler};
pub use user::{UserCommandHandler, UserQueryHandler};
