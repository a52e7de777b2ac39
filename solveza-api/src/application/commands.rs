use std::collections::BTreeSet;

use crate::domain::value_object::{AccountId, Money, PermissionId, Provider, RoleId, UserId};

/// 注册或更新用户命令（按 provider + external_id 幂等）
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub provider: Provider,
    pub external_id: String,
    pub name: String,
    pub email: Option<String>,
}

/// 为用户分配角色命令
#[derive(Debug, Clone)]
pub struct AssignRoleCommand {
    pub user_id: UserId,
    pub role_id: RoleId,
}

/// 创建角色命令
#[derive(Debug, Clone)]
pub struct CreateRoleCommand {
    pub name: String,
    pub description: Option<String>,
}

/// 整体替换角色权限命令
#[derive(Debug, Clone)]
pub struct DefineRolePermissionsCommand {
    pub role_id: RoleId,
    pub permission_ids: BTreeSet<PermissionId>,
}

/// 删除角色命令
#[derive(Debug, Clone)]
pub struct DeleteRoleCommand {
    pub role_id: RoleId,
}

/// 创建权限命令
#[derive(Debug, Clone)]
pub struct CreatePermissionCommand {
    pub name: String,
    pub resource: String,
    pub action: String,
}

/// 删除权限命令
#[derive(Debug, Clone)]
pub struct DeletePermissionCommand {
    pub permission_id: PermissionId,
}

/// 创建账户命令
#[derive(Debug, Clone)]
pub struct CreateAccountCommand {
    pub requester_id: UserId,
    pub payer_id: UserId,
}

/// 删除账户命令
#[derive(Debug, Clone)]
pub struct DeleteAccountCommand {
    pub account_id: AccountId,
}

/// 记录入金命令
#[derive(Debug, Clone)]
pub struct RecordDepositCommand {
    pub account_id: AccountId,
    pub amount: Money,
    pub description: String,
}

/// 记录付款命令
#[derive(Debug, Clone)]
pub struct RecordPaymentCommand {
    pub account_id: AccountId,
    pub amount: Money,
    pub description: String,
}
