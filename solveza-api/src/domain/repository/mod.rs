//! 仓储接口
//!
//! 仓储以 trait 对象形式注入，PostgreSQL 与内存两种实现共用同一组接口

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::model::{Account, Permission, Role, Transaction, User};
use crate::domain::value_object::{
    AccountId, PermissionId, Provider, RoleId, TransactionId, UserId,
};

/// 用户查询条件，未设置的条件不参与过滤
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSearchCriteria {
    pub provider: Option<Provider>,
    pub external_id: Option<String>,
}

impl UserSearchCriteria {
    pub fn matches(&self, user: &User) -> bool {
        self.provider
            .as_ref()
            .map(|p| user.provider() == p)
            .unwrap_or(true)
            && self
                .external_id
                .as_deref()
                .map(|id| user.external_id() == id)
                .unwrap_or(true)
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>>;
    async fn find_by_provider_and_external_id(
        &self,
        provider: &Provider,
        external_id: &str,
    ) -> DomainResult<Option<User>>;
    /// 按条件查询，结果按创建时间升序
    async fn find_by_criteria(&self, criteria: &UserSearchCriteria) -> DomainResult<Vec<User>>;
    /// 新增或更新用户，并同步其角色关联
    async fn save(&self, user: &User) -> DomainResult<()>;
    async fn exists_by_id(&self, id: UserId) -> DomainResult<bool>;
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_id(&self, id: RoleId) -> DomainResult<Option<Role>>;
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Role>>;
    /// 全部角色，按名称排序
    async fn find_all(&self) -> DomainResult<Vec<Role>>;
    /// 新增或更新角色，并同步其权限关联
    async fn save(&self, role: &Role) -> DomainResult<()>;
    async fn delete(&self, id: RoleId) -> DomainResult<()>;
    async fn exists_by_id(&self, id: RoleId) -> DomainResult<bool>;
    async fn exists_by_name(&self, name: &str) -> DomainResult<bool>;
}

#[async_trait]
pub trait PermissionRepository: Send + Sync {
    async fn find_by_id(&self, id: PermissionId) -> DomainResult<Option<Permission>>;
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Permission>>;
    /// 全部权限，按名称排序
    async fn find_all(&self) -> DomainResult<Vec<Permission>>;
    async fn save(&self, permission: &Permission) -> DomainResult<()>;
    async fn delete(&self, id: PermissionId) -> DomainResult<()>;
    async fn exists_by_id(&self, id: PermissionId) -> DomainResult<bool>;
    async fn exists_by_name(&self, name: &str) -> DomainResult<bool>;
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: AccountId) -> DomainResult<Option<Account>>;
    /// 用户作为请求方或付款方参与的账户，按创建时间升序
    async fn find_by_user_id(&self, user_id: UserId) -> DomainResult<Vec<Account>>;
    /// 新增或更新账户；请求方与付款方组合重复时返回 `DuplicateAccount`
    async fn save(&self, account: &Account) -> DomainResult<()>;
    async fn delete(&self, id: AccountId) -> DomainResult<()>;
    async fn exists_by_id(&self, id: AccountId) -> DomainResult<bool>;
    async fn exists_by_requester_and_payer(
        &self,
        requester_id: UserId,
        payer_id: UserId,
    ) -> DomainResult<bool>;
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn save(&self, transaction: &Transaction) -> DomainResult<()>;
    async fn find_by_id(&self, id: TransactionId) -> DomainResult<Option<Transaction>>;
    /// 账户的全部交易，按执行时间升序
    async fn find_by_account_id(&self, account_id: AccountId) -> DomainResult<Vec<Transaction>>;
}

pub type UserRepositoryRef = Arc<dyn UserRepository>;
pub type RoleRepositoryRef = Arc<dyn RoleRepository>;
pub type PermissionRepositoryRef = Arc<dyn PermissionRepository>;
pub type AccountRepositoryRef = Arc<dyn AccountRepository>;
pub type TransactionRepositoryRef = Arc<dyn TransactionRepository>;
