use std::sync::Arc;

use crate::application::handlers::{
    AccountCommandHandler, AccountQueryHandler, PermissionCommandHandler, PermissionQueryHandler,
    RoleCommandHandler, RoleQueryHandler, TransactionCommandHandler, TransactionQueryHandler,
    UserCommandHandler, UserQueryHandler,
};

/// 路由共享状态，持有所有命令与查询处理器
#[derive(Clone)]
pub struct AppState {
    pub user_commands: Arc<UserCommandHandler>,
    pub user_queries: Arc<UserQueryHandler>,
    pub role_commands: Arc<RoleCommandHandler>,
    pub role_queries: Arc<RoleQueryHandler>,
    pub permission_commands: Arc<PermissionCommandHandler>,
    pub permission_queries: Arc<PermissionQueryHandler>,
    pub account_commands: Arc<AccountCommandHandler>,
    pub account_queries: Arc<AccountQueryHandler>,
    pub transaction_commands: Arc<TransactionCommandHandler>,
    pub transaction_queries: Arc<TransactionQueryHandler>,
}
