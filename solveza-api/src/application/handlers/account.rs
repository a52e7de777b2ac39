use std::sync::Arc;

use tracing::{debug, info};

use crate::application::commands::{CreateAccountCommand, DeleteAccountCommand};
use crate::application::dto::AccountDto;
use crate::application::queries::{GetAccountQuery, ListAccountsByUserQuery};
use crate::domain::errors::DomainResult;
use crate::domain::model::{Account, Payer, Requester};
use crate::domain::repository::AccountRepositoryRef;
use crate::domain::service::AccountValidationService;

/// 账户命令处理器
pub struct AccountCommandHandler {
    account_repo: AccountRepositoryRef,
    validation: Arc<AccountValidationService>,
}

impl AccountCommandHandler {
    pub fn new(
        account_repo: AccountRepositoryRef,
        validation: Arc<AccountValidationService>,
    ) -> Self {
        Self {
            account_repo,
            validation,
        }
    }

    /// 创建账户：双方用户必须存在，组合唯一且不能是同一用户
    pub async fn handle_create_account(
        &self,
        command: CreateAccountCommand,
    ) -> DomainResult<AccountDto> {
        debug!(
            requester_id = %command.requester_id,
            payer_id = %command.payer_id,
            "Handling create account command"
        );

        self.validation
            .validate_users_exist(command.requester_id, command.payer_id)
            .await?;
        self.validation
            .validate_unique_requester_payer_pair(command.requester_id, command.payer_id)
            .await?;

        let account = Account::create(
            Requester::new(command.requester_id),
            Payer::new(command.payer_id),
        )?;
        self.account_repo.save(&account).await?;

        info!(account_id = %account.id(), "Account created");
        Ok(AccountDto::from(&account))
    }

    /// 删除账户（其交易记录一并删除）
    pub async fn handle_delete_account(&self, command: DeleteAccountCommand) -> DomainResult<()> {
        debug!(account_id = %command.account_id, "Handling delete account command");

        self.validation
            .validate_account_exists(command.account_id)
            .await?;
        self.account_repo.delete(command.account_id).await?;

        info!(account_id = %command.account_id, "Account deleted");
        Ok(())
    }
}

/// 账户查询处理器
pub struct AccountQueryHandler {
    account_repo: AccountRepositoryRef,
    validation: Arc<AccountValidationService>,
}

impl AccountQueryHandler {
    pub fn new(
        account_repo: AccountRepositoryRef,
        validation: Arc<AccountValidationService>,
    ) -> Self {
        Self {
            account_repo,
            validation,
        }
    }

    pub async fn handle_get_account(&self, query: GetAccountQuery) -> DomainResult<AccountDto> {
        debug!(account_id = %query.account_id, "Handling get account query");
        let account = self
            .validation
            .validate_account_exists(query.account_id)
            .await?;
        Ok(AccountDto::from(&account))
    }

    pub async fn handle_list_by_user(
        &self,
        query: ListAccountsByUserQuery,
    ) -> DomainResult<Vec<AccountDto>> {
        debug!(user_id = %query.user_id, "Handling list accounts by user query");
        let accounts = self.account_repo.find_by_user_id(query.user_id).await?;
        Ok(accounts.iter().map(AccountDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use crate::domain::model::User;
    use crate::domain::repository::{UserRepository, UserRepositoryRef};
    use crate::domain::value_object::{AccountId, Provider, UserId};
    use crate::infrastructure::memory::{
        InMemoryAccountRepository, InMemoryDatabase, InMemoryUserRepository,
    };

    struct Fixture {
        commands: AccountCommandHandler,
        queries: AccountQueryHandler,
        users: UserRepositoryRef,
    }

    fn fixture() -> Fixture {
        let db = InMemoryDatabase::new();
        let accounts: AccountRepositoryRef =
            Arc::new(InMemoryAccountRepository::with_database(db.clone()));
        let users: UserRepositoryRef = Arc::new(InMemoryUserRepository::with_database(db));
        let validation = Arc::new(AccountValidationService::new(
            accounts.clone(),
            users.clone(),
        ));
        Fixture {
            commands: AccountCommandHandler::new(accounts.clone(), validation.clone()),
            queries: AccountQueryHandler::new(accounts, validation),
            users,
        }
    }

    async fn user(users: &UserRepositoryRef, external_id: &str) -> UserId {
        let user = User::create(Provider::github(), external_id, external_id, None).unwrap();
        users.save(&user).await.unwrap();
        user.id()
    }

    #[tokio::test]
    async fn test_create_account_and_list_for_both_sides() {
        let fx = fixture();
        let requester = user(&fx.users, "alice").await;
        let payer = user(&fx.users, "bob").await;

        let account = fx
            .commands
            .handle_create_account(CreateAccountCommand {
                requester_id: requester,
                payer_id: payer,
            })
            .await
            .unwrap();
        assert_eq!(account.requester_id, requester.as_uuid());

        for user_id in [requester, payer] {
            let listed = fx
                .queries
                .handle_list_by_user(ListAccountsByUserQuery { user_id })
                .await
                .unwrap();
            assert_eq!(listed, vec![account.clone()]);
        }
    }

    #[tokio::test]
    async fn test_create_account_error_cases() {
        let fx = fixture();
        let alice = user(&fx.users, "alice").await;
        let bob = user(&fx.users, "bob").await;

        let unknown = fx
            .commands
            .handle_create_account(CreateAccountCommand {
                requester_id: alice,
                payer_id: UserId::generate(),
            })
            .await
            .unwrap_err();
        assert!(matches!(unknown, DomainError::UserNotFound(_)));

        let same = fx
            .commands
            .handle_create_account(CreateAccountCommand {
                requester_id: alice,
                payer_id: alice,
            })
            .await
            .unwrap_err();
        assert!(matches!(same, DomainError::InvalidArgument(_)));

        let command = CreateAccountCommand {
            requester_id: alice,
            payer_id: bob,
        };
        fx.commands.handle_create_account(command.clone()).await.unwrap();
        let duplicate = fx.commands.handle_create_account(command).await.unwrap_err();
        assert!(matches!(duplicate, DomainError::DuplicateAccount(_)));
    }

    #[tokio::test]
    async fn test_delete_unknown_account() {
        let fx = fixture();
        let err = fx
            .commands
            .handle_delete_account(DeleteAccountCommand {
                account_id: AccountId::generate(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AccountNotFound(_)));
    }
}
