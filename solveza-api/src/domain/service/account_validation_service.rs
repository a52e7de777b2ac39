//! 账户创建与访问前的校验

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::Account;
use crate::domain::repository::{AccountRepositoryRef, UserRepositoryRef};
use crate::domain::value_object::{AccountId, UserId};

pub struct AccountValidationService {
    account_repo: AccountRepositoryRef,
    user_repo: UserRepositoryRef,
}

impl AccountValidationService {
    pub fn new(account_repo: AccountRepositoryRef, user_repo: UserRepositoryRef) -> Self {
        Self {
            account_repo,
            user_repo,
        }
    }

    /// 请求方与付款方都必须存在，先检查请求方
    pub async fn validate_users_exist(
        &self,
        requester_id: UserId,
        payer_id: UserId,
    ) -> DomainResult<()> {
        self.validate_user_exists(requester_id).await?;
        self.validate_user_exists(payer_id).await
    }

    pub async fn validate_user_exists(&self, user_id: UserId) -> DomainResult<()> {
        if !self.user_repo.exists_by_id(user_id).await? {
            return Err(DomainError::UserNotFound(user_id.to_string()));
        }
        Ok(())
    }

    pub async fn validate_account_exists(&self, account_id: AccountId) -> DomainResult<Account> {
        self.account_repo
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| DomainError::AccountNotFound(account_id.to_string()))
    }

    pub async fn validate_unique_requester_payer_pair(
        &self,
        requester_id: UserId,
        payer_id: UserId,
    ) -> DomainResult<()> {
        if self
            .account_repo
            .exists_by_requester_and_payer(requester_id, payer_id)
            .await?
        {
            return Err(DomainError::DuplicateAccount(format!(
                "account already exists for requester {requester_id} and payer {payer_id}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::model::{Payer, Requester, User};
    use crate::domain::repository::{AccountRepository, UserRepository};
    use crate::domain::value_object::Provider;
    use crate::infrastructure::memory::{InMemoryAccountRepository, InMemoryUserRepository};

    async fn saved_user(repo: &InMemoryUserRepository, external_id: &str) -> UserId {
        let user = User::create(Provider::google(), external_id, "user", None).unwrap();
        repo.save(&user).await.unwrap();
        user.id()
    }

    #[tokio::test]
    async fn test_requester_checked_before_payer() {
        let users = Arc::new(InMemoryUserRepository::new());
        let accounts = Arc::new(InMemoryAccountRepository::new());
        let service = AccountValidationService::new(accounts, users.clone());

        let payer = saved_user(&users, "payer").await;
        let missing = UserId::generate();

        let err = service.validate_users_exist(missing, payer).await.unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound(id) if id == missing.to_string()));
    }

    #[tokio::test]
    async fn test_duplicate_pair_detected() {
        let users = Arc::new(InMemoryUserRepository::new());
        let accounts = Arc::new(InMemoryAccountRepository::new());
        let service = AccountValidationService::new(accounts.clone(), users.clone());

        let requester = saved_user(&users, "r").await;
        let payer = saved_user(&users, "p").await;
        let account = Account::create(Requester::new(requester), Payer::new(payer)).unwrap();
        accounts.save(&account).await.unwrap();

        let err = service
            .validate_unique_requester_payer_pair(requester, payer)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateAccount(_)));

        // 反向组合是另一个账户
        assert!(
            service
                .validate_unique_requester_payer_pair(payer, requester)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_missing_account() {
        let service = AccountValidationService::new(
            Arc::new(InMemoryAccountRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
        );
        let err = service
            .validate_account_exists(AccountId::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AccountNotFound(_)));
    }
}
