//! Wire 风格的依赖注入模块
//!
//! 按依赖顺序构建仓储、领域服务、命令/查询处理器与 HTTP 路由

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use solveza_core::config::SolvezaAppConfig;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::application::handlers::{
    AccountCommandHandler, AccountQueryHandler, PermissionCommandHandler, PermissionQueryHandler,
    RoleCommandHandler, RoleQueryHandler, TransactionCommandHandler, TransactionQueryHandler,
    UserCommandHandler, UserQueryHandler,
};
use crate::config::ApiConfig;
use crate::domain::repository::{
    AccountRepositoryRef, PermissionRepositoryRef, RoleRepositoryRef, TransactionRepositoryRef,
    UserRepositoryRef,
};
use crate::domain::service::{
    AccountBalanceService, AccountValidationService, TransactionValidationService,
    UserValidationService,
};
use crate::infrastructure::memory::{
    InMemoryAccountRepository, InMemoryDatabase, InMemoryPermissionRepository,
    InMemoryRoleRepository, InMemoryTransactionRepository, InMemoryUserRepository,
};
use crate::infrastructure::persistence::{
    PostgresAccountRepository, PostgresPermissionRepository, PostgresRoleRepository,
    PostgresTransactionRepository, PostgresUserRepository, connect_pool, run_migrations,
};
use crate::interface::http::{AppState, build_router};

/// 应用上下文 - 包含所有已初始化的组件
pub struct ApplicationContext {
    pub router: Router,
    /// 使用内存仓储时为 `None`
    pub pool: Option<Arc<PgPool>>,
}

/// 全部仓储
#[derive(Clone)]
pub struct Repositories {
    pub users: UserRepositoryRef,
    pub roles: RoleRepositoryRef,
    pub permissions: PermissionRepositoryRef,
    pub accounts: AccountRepositoryRef,
    pub transactions: TransactionRepositoryRef,
}

impl Repositories {
    /// 共享同一个内存数据库的仓储集合
    pub fn in_memory() -> Self {
        let db = InMemoryDatabase::new();
        Self {
            users: Arc::new(InMemoryUserRepository::with_database(db.clone())),
            roles: Arc::new(InMemoryRoleRepository::with_database(db.clone())),
            permissions: Arc::new(InMemoryPermissionRepository::with_database(db.clone())),
            accounts: Arc::new(InMemoryAccountRepository::with_database(db.clone())),
            transactions: Arc::new(InMemoryTransactionRepository::with_database(db)),
        }
    }

    pub fn postgres(pool: Arc<PgPool>) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            roles: Arc::new(PostgresRoleRepository::new(pool.clone())),
            permissions: Arc::new(PostgresPermissionRepository::new(pool.clone())),
            accounts: Arc::new(PostgresAccountRepository::new(pool.clone())),
            transactions: Arc::new(PostgresTransactionRepository::new(pool)),
        }
    }
}

/// 构建应用上下文
///
/// 类似 Go Wire 的 Initialize 函数，按照依赖顺序构建所有组件
pub async fn initialize(app_config: &SolvezaAppConfig) -> Result<ApplicationContext> {
    // 1. 加载配置
    let api_config = ApiConfig::from_app_config(app_config)?;

    // 2. 构建仓储
    let (repositories, pool) = match &api_config.database {
        Some(settings) => {
            let pool = connect_pool(settings).await?;
            if api_config.run_migrations {
                run_migrations(&pool)
                    .await
                    .context("Failed to apply database migrations")?;
            }
            (Repositories::postgres(pool.clone()), Some(pool))
        }
        None => {
            warn!("No PostgreSQL profile configured, using in-memory repositories (data is not durable)");
            (Repositories::in_memory(), None)
        }
    };

    // 3. 构建领域服务、处理器与路由
    let router = build_app_router(repositories, api_config.cors_permissive);

    info!(durable = pool.is_some(), "Application context initialized");
    Ok(ApplicationContext { router, pool })
}

/// 从仓储构建应用状态
pub fn build_state(repositories: Repositories) -> AppState {
    // 领域服务
    let user_validation = Arc::new(UserValidationService::new(
        repositories.users.clone(),
        repositories.roles.clone(),
        repositories.permissions.clone(),
    ));
    let account_validation = Arc::new(AccountValidationService::new(
        repositories.accounts.clone(),
        repositories.users.clone(),
    ));
    let transaction_validation = Arc::new(TransactionValidationService::new(
        repositories.accounts.clone(),
    ));
    let balance_service = Arc::new(AccountBalanceService::new(
        repositories.transactions.clone(),
    ));

    // 命令与查询处理器
    AppState {
        user_commands: Arc::new(UserCommandHandler::new(
            repositories.users.clone(),
            user_validation.clone(),
        )),
        user_queries: Arc::new(UserQueryHandler::new(
            repositories.users.clone(),
            user_validation.clone(),
        )),
        role_commands: Arc::new(RoleCommandHandler::new(
            repositories.roles.clone(),
            user_validation.clone(),
        )),
        role_queries: Arc::new(RoleQueryHandler::new(
            repositories.roles.clone(),
            user_validation.clone(),
        )),
        permission_commands: Arc::new(PermissionCommandHandler::new(
            repositories.permissions.clone(),
            user_validation.clone(),
        )),
        permission_queries: Arc::new(PermissionQueryHandler::new(
            repositories.permissions.clone(),
            user_validation,
        )),
        account_commands: Arc::new(AccountCommandHandler::new(
            repositories.accounts.clone(),
            account_validation.clone(),
        )),
        account_queries: Arc::new(AccountQueryHandler::new(
            repositories.accounts.clone(),
            account_validation,
        )),
        transaction_commands: Arc::new(TransactionCommandHandler::new(
            repositories.transactions.clone(),
            transaction_validation.clone(),
        )),
        transaction_queries: Arc::new(TransactionQueryHandler::new(
            repositories.transactions,
            transaction_validation,
            balance_service,
        )),
    }
}

/// 从仓储构建完整路由
pub fn build_app_router(repositories: Repositories, cors_permissive: bool) -> Router {
    build_router(build_state(repositories), cors_permissive)
}
