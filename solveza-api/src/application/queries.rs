use crate::domain::value_object::{AccountId, PermissionId, Provider, RoleId, UserId};

/// 查询单个用户
#[derive(Debug, Clone)]
pub struct GetUserQuery {
    pub user_id: UserId,
}

/// 按条件查询用户，条件为空时返回全部
#[derive(Debug, Clone, Default)]
pub struct ListUsersQuery {
    pub provider: Option<Provider>,
    pub external_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GetRoleQuery {
    pub role_id: RoleId,
}

#[derive(Debug, Clone)]
pub struct FindRoleByNameQuery {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct GetPermissionQuery {
    pub permission_id: PermissionId,
}

#[derive(Debug, Clone)]
pub struct FindPermissionByNameQuery {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct GetAccountQuery {
    pub account_id: AccountId,
}

/// 查询用户作为请求方或付款方参与的账户
#[derive(Debug, Clone)]
pub struct ListAccountsByUserQuery {
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct GetTransactionHistoryQuery {
    pub account_id: AccountId,
}

#[derive(Debug, Clone)]
pub struct GetAccountBalanceQuery {
    pub account_id: AccountId,
}
