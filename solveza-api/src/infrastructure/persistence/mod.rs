//! PostgreSQL 持久化

pub mod pool;
pub mod postgres_account_repository;
pub mod postgres_permission_repository;
pub mod postgres_role_repository;
pub mod postgres_transaction_repository;
pub mod postgres_user_repository;

pub use pool::{connect_pool, run_migrations};
pub use postgres_account_repository::PostgresAccountRepository;
pub use postgres_permission_repository::PostgresPermissionRepository;
pub use postgres_role_repository::PostgresRoleRepository;
pub use postgres_transaction_repository::PostgresTransactionRepository;
pub use postgres_user_repository::PostgresUserRepository;

use crate::domain::errors::DomainError;

/// 写入失败时，唯一约束冲突转换为业务错误，其余作为基础设施错误
pub(crate) fn map_write_error(
    err: sqlx::Error,
    context: &'static str,
    on_conflict: impl FnOnce() -> DomainError,
) -> DomainError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => on_conflict(),
        _ => DomainError::Infrastructure(anyhow::Error::new(err).context(context)),
    }
}
