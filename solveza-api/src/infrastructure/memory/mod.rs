//! 内存仓储实现
//!
//! 未配置 PostgreSQL 时使用（数据不持久化），同时用于测试。
//! 所有仓储共享一个 [`InMemoryDatabase`]，删除时按数据库外键的级联语义清理关联数据。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::{Account, Permission, Role, Transaction, User};
use crate::domain::repository::{
    AccountRepository, PermissionRepository, RoleRepository, TransactionRepository,
    UserRepository, UserSearchCriteria,
};
use crate::domain::value_object::{
    AccountId, PermissionId, Provider, RoleId, TransactionId, UserId,
};

/// 共享的内存数据
#[derive(Default)]
pub struct InMemoryDatabase {
    users: RwLock<HashMap<UserId, User>>,
    roles: RwLock<HashMap<RoleId, Role>>,
    permissions: RwLock<HashMap<PermissionId, Permission>>,
    accounts: RwLock<HashMap<AccountId, Account>>,
    transactions: RwLock<HashMap<TransactionId, Transaction>>,
}

impl InMemoryDatabase {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[derive(Clone)]
pub struct InMemoryUserRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::with_database(InMemoryDatabase::new())
    }

    pub fn with_database(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>> {
        let guard = self.db.users.read().await;
        Ok(guard.get(&id).cloned())
    }

    async fn find_by_provider_and_external_id(
        &self,
        provider: &Provider,
        external_id: &str,
    ) -> DomainResult<Option<User>> {
        let guard = self.db.users.read().await;
        Ok(guard
            .values()
            .find(|user| user.provider() == provider && user.external_id() == external_id)
            .cloned())
    }

    async fn find_by_criteria(&self, criteria: &UserSearchCriteria) -> DomainResult<Vec<User>> {
        let guard = self.db.users.read().await;
        let mut users: Vec<User> = guard
            .values()
            .filter(|user| criteria.matches(user))
            .cloned()
            .collect();
        users.sort_by_key(|user| (user.created_at(), user.id()));
        Ok(users)
    }

    async fn save(&self, user: &User) -> DomainResult<()> {
        let mut guard = self.db.users.write().await;
        let conflict = guard.values().any(|existing| {
            existing.id() != user.id()
                && existing.provider() == user.provider()
                && existing.external_id() == user.external_id()
        });
        if conflict {
            return Err(DomainError::invalid_argument(format!(
                "user already exists for provider {} and external id {}",
                user.provider(),
                user.external_id()
            )));
        }
        guard.insert(user.id(), user.clone());
        Ok(())
    }

    async fn exists_by_id(&self, id: UserId) -> DomainResult<bool> {
        let guard = self.db.users.read().await;
        Ok(guard.contains_key(&id))
    }
}

#[derive(Clone)]
pub struct InMemoryRoleRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryRoleRepository {
    pub fn new() -> Self {
        Self::with_database(InMemoryDatabase::new())
    }

    pub fn with_database(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

impl Default for InMemoryRoleRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn find_by_id(&self, id: RoleId) -> DomainResult<Option<Role>> {
        let guard = self.db.roles.read().await;
        Ok(guard.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Role>> {
        let guard = self.db.roles.read().await;
        Ok(guard.values().find(|role| role.name() == name).cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<Role>> {
        let guard = self.db.roles.read().await;
        let mut roles: Vec<Role> = guard.values().cloned().collect();
        roles.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(roles)
    }

    async fn save(&self, role: &Role) -> DomainResult<()> {
        let mut guard = self.db.roles.write().await;
        if guard
            .values()
            .any(|existing| existing.id() != role.id() && existing.name() == role.name())
        {
            return Err(DomainError::invalid_argument(format!(
                "role name already exists: {}",
                role.name()
            )));
        }
        guard.insert(role.id(), role.clone());
        Ok(())
    }

    async fn delete(&self, id: RoleId) -> DomainResult<()> {
        self.db.roles.write().await.remove(&id);
        let mut users = self.db.users.write().await;
        for user in users.values_mut().filter(|user| user.has_role(id)) {
            user.remove_role(id);
        }
        Ok(())
    }

    async fn exists_by_id(&self, id: RoleId) -> DomainResult<bool> {
        let guard = self.db.roles.read().await;
        Ok(guard.contains_key(&id))
    }

    async fn exists_by_name(&self, name: &str) -> DomainResult<bool> {
        let guard = self.db.roles.read().await;
        Ok(guard.values().any(|role| role.name() == name))
    }
}

#[derive(Clone)]
pub struct InMemoryPermissionRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryPermissionRepository {
    pub fn new() -> Self {
        Self::with_database(InMemoryDatabase::new())
    }

    pub fn with_database(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

impl Default for InMemoryPermissionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PermissionRepository for InMemoryPermissionRepository {
    async fn find_by_id(&self, id: PermissionId) -> DomainResult<Option<Permission>> {
        let guard = self.db.permissions.read().await;
        Ok(guard.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Permission>> {
        let guard = self.db.permissions.read().await;
        Ok(guard
            .values()
            .find(|permission| permission.name() == name)
            .cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<Permission>> {
        let guard = self.db.permissions.read().await;
        let mut permissions: Vec<Permission> = guard.values().cloned().collect();
        permissions.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(permissions)
    }

    async fn save(&self, permission: &Permission) -> DomainResult<()> {
        let mut guard = self.db.permissions.write().await;
        if guard.values().any(|existing| {
            existing.id() != permission.id() && existing.name() == permission.name()
        }) {
            return Err(DomainError::invalid_argument(format!(
                "permission name already exists: {}",
                permission.name()
            )));
        }
        guard.insert(permission.id(), permission.clone());
        Ok(())
    }

    async fn delete(&self, id: PermissionId) -> DomainResult<()> {
        self.db.permissions.write().await.remove(&id);
        let mut roles = self.db.roles.write().await;
        for role in roles.values_mut().filter(|role| role.has_permission(id)) {
            role.revoke_permission(id);
        }
        Ok(())
    }

    async fn exists_by_id(&self, id: PermissionId) -> DomainResult<bool> {
        let guard = self.db.permissions.read().await;
        Ok(guard.contains_key(&id))
    }

    async fn exists_by_name(&self, name: &str) -> DomainResult<bool> {
        let guard = self.db.permissions.read().await;
        Ok(guard.values().any(|permission| permission.name() == name))
    }
}

#[derive(Clone)]
pub struct InMemoryAccountRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::with_database(InMemoryDatabase::new())
    }

    pub fn with_database(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_id(&self, id: AccountId) -> DomainResult<Option<Account>> {
        let guard = self.db.accounts.read().await;
        Ok(guard.get(&id).cloned())
    }

    async fn find_by_user_id(&self, user_id: UserId) -> DomainResult<Vec<Account>> {
        let guard = self.db.accounts.read().await;
        let mut accounts: Vec<Account> = guard
            .values()
            .filter(|account| account.is_participant(user_id))
            .cloned()
            .collect();
        accounts.sort_by_key(|account| (account.created_at(), account.id()));
        Ok(accounts)
    }

    async fn save(&self, account: &Account) -> DomainResult<()> {
        let mut guard = self.db.accounts.write().await;
        let duplicate = guard.values().any(|existing| {
            existing.id() != account.id()
                && existing.requester() == account.requester()
                && existing.payer() == account.payer()
        });
        if duplicate {
            return Err(DomainError::DuplicateAccount(format!(
                "account already exists for requester {} and payer {}",
                account.requester().user_id(),
                account.payer().user_id()
            )));
        }
        guard.insert(account.id(), account.clone());
        Ok(())
    }

    async fn delete(&self, id: AccountId) -> DomainResult<()> {
        self.db.accounts.write().await.remove(&id);
        self.db
            .transactions
            .write()
            .await
            .retain(|_, tx| tx.account_id() != id);
        Ok(())
    }

    async fn exists_by_id(&self, id: AccountId) -> DomainResult<bool> {
        let guard = self.db.accounts.read().await;
        Ok(guard.contains_key(&id))
    }

    async fn exists_by_requester_and_payer(
        &self,
        requester_id: UserId,
        payer_id: UserId,
    ) -> DomainResult<bool> {
        let guard = self.db.accounts.read().await;
        Ok(guard
            .values()
            .any(|account| account.is_requester(requester_id) && account.is_payer(payer_id)))
    }
}

#[derive(Clone)]
pub struct InMemoryTransactionRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::with_database(InMemoryDatabase::new())
    }

    pub fn with_database(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

impl Default for InMemoryTransactionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn save(&self, transaction: &Transaction) -> DomainResult<()> {
        let mut guard = self.db.transactions.write().await;
        guard.insert(transaction.id(), transaction.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TransactionId) -> DomainResult<Option<Transaction>> {
        let guard = self.db.transactions.read().await;
        Ok(guard.get(&id).cloned())
    }

    async fn find_by_account_id(&self, account_id: AccountId) -> DomainResult<Vec<Transaction>> {
        let guard = self.db.transactions.read().await;
        let mut transactions: Vec<Transaction> = guard
            .values()
            .filter(|tx| tx.account_id() == account_id)
            .cloned()
            .collect();
        transactions.sort_by_key(|tx| (tx.executed_at(), tx.created_at(), tx.id()));
        Ok(transactions)
    }
}
