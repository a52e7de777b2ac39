use std::sync::Arc;

use tracing::{debug, info};

use crate::application::commands::{RecordDepositCommand, RecordPaymentCommand};
use crate::application::dto::{BalanceDto, TransactionDto};
use crate::application::queries::{GetAccountBalanceQuery, GetTransactionHistoryQuery};
use crate::domain::errors::DomainResult;
use crate::domain::model::Transaction;
use crate::domain::repository::TransactionRepositoryRef;
use crate::domain::service::{AccountBalanceService, TransactionValidationService};

/// 交易命令处理器
pub struct TransactionCommandHandler {
    transaction_repo: TransactionRepositoryRef,
    validation: Arc<TransactionValidationService>,
}

impl TransactionCommandHandler {
    pub fn new(
        transaction_repo: TransactionRepositoryRef,
        validation: Arc<TransactionValidationService>,
    ) -> Self {
        Self {
            transaction_repo,
            validation,
        }
    }

    pub async fn handle_record_deposit(
        &self,
        command: RecordDepositCommand,
    ) -> DomainResult<TransactionDto> {
        debug!(
            account_id = %command.account_id,
            amount = %command.amount,
            "Handling record deposit command"
        );

        self.validation
            .validate_account_exists(command.account_id)
            .await?;
        self.validation.validate_transaction_amount(&command.amount)?;

        let transaction =
            Transaction::create_deposit(command.account_id, command.amount, &command.description)?;
        self.transaction_repo.save(&transaction).await?;

        info!(
            transaction_id = %transaction.id(),
            account_id = %command.account_id,
            "Deposit recorded"
        );
        Ok(TransactionDto::from(&transaction))
    }

    pub async fn handle_record_payment(
        &self,
        command: RecordPaymentCommand,
    ) -> DomainResult<TransactionDto> {
        debug!(
            account_id = %command.account_id,
            amount = %command.amount,
            "Handling record payment command"
        );

        self.validation
            .validate_account_exists(command.account_id)
            .await?;
        self.validation.validate_transaction_amount(&command.amount)?;

        let transaction =
            Transaction::create_payment(command.account_id, command.amount, &command.description)?;
        self.transaction_repo.save(&transaction).await?;

        info!(
            transaction_id = %transaction.id(),
            account_id = %command.account_id,
            "Payment recorded"
        );
        Ok(TransactionDto::from(&transaction))
    }
}

/// 交易查询处理器
pub struct TransactionQueryHandler {
    transaction_repo: TransactionRepositoryRef,
    validation: Arc<TransactionValidationService>,
    balance_service: Arc<AccountBalanceService>,
}

impl TransactionQueryHandler {
    pub fn new(
        transaction_repo: TransactionRepositoryRef,
        validation: Arc<TransactionValidationService>,
        balance_service: Arc<AccountBalanceService>,
    ) -> Self {
        Self {
            transaction_repo,
            validation,
            balance_service,
        }
    }

    pub async fn handle_get_history(
        &self,
        query: GetTransactionHistoryQuery,
    ) -> DomainResult<Vec<TransactionDto>> {
        debug!(account_id = %query.account_id, "Handling transaction history query");

        self.validation
            .validate_account_exists(query.account_id)
            .await?;
        let transactions = self
            .transaction_repo
            .find_by_account_id(query.account_id)
            .await?;
        Ok(transactions.iter().map(TransactionDto::from).collect())
    }

    pub async fn handle_get_balance(
        &self,
        query: GetAccountBalanceQuery,
    ) -> DomainResult<BalanceDto> {
        debug!(account_id = %query.account_id, "Handling account balance query");

        self.validation
            .validate_account_exists(query.account_id)
            .await?;
        let balance = self
            .balance_service
            .calculate_balance(query.account_id)
            .await?;
        Ok(BalanceDto::new(query.account_id, balance))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::errors::DomainError;
    use crate::domain::model::{Account, Payer, Requester};
    use crate::domain::repository::{AccountRepository, AccountRepositoryRef};
    use crate::domain::value_object::{AccountId, Money, UserId};
    use crate::infrastructure::memory::{
        InMemoryAccountRepository, InMemoryDatabase, InMemoryTransactionRepository,
    };

    struct Fixture {
        commands: TransactionCommandHandler,
        queries: TransactionQueryHandler,
        accounts: AccountRepositoryRef,
    }

    fn fixture() -> Fixture {
        let db = InMemoryDatabase::new();
        let accounts: AccountRepositoryRef =
            Arc::new(InMemoryAccountRepository::with_database(db.clone()));
        let transactions: TransactionRepositoryRef =
            Arc::new(InMemoryTransactionRepository::with_database(db));
        let validation = Arc::new(TransactionValidationService::new(accounts.clone()));
        let balance = Arc::new(AccountBalanceService::new(transactions.clone()));
        Fixture {
            commands: TransactionCommandHandler::new(transactions.clone(), validation.clone()),
            queries: TransactionQueryHandler::new(transactions, validation, balance),
            accounts,
        }
    }

    async fn account(accounts: &AccountRepositoryRef) -> AccountId {
        let account =
            Account::create(Requester::new(UserId::generate()), Payer::new(UserId::generate()))
                .unwrap();
        accounts.save(&account).await.unwrap();
        account.id()
    }

    fn yen(amount: i64) -> Money {
        Money::yen(Decimal::new(amount, 0)).unwrap()
    }

    #[tokio::test]
    async fn test_deposit_and_payment_update_balance() {
        let fx = fixture();
        let account_id = account(&fx.accounts).await;

        let deposit = fx
            .commands
            .handle_record_deposit(RecordDepositCommand {
                account_id,
                amount: yen(5_000),
                description: "initial".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(deposit.transaction_type, "DEPOSIT");

        fx.commands
            .handle_record_payment(RecordPaymentCommand {
                account_id,
                amount: yen(1_200),
                description: "lunch".to_string(),
            })
            .await
            .unwrap();

        let history = fx
            .queries
            .handle_get_history(GetTransactionHistoryQuery { account_id })
            .await
            .unwrap();
        assert_eq!(history.len(), 2);

        let balance = fx
            .queries
            .handle_get_balance(GetAccountBalanceQuery { account_id })
            .await
            .unwrap();
        assert_eq!(balance.amount, Decimal::new(3_800, 0));
        assert_eq!(balance.currency, "JPY");
    }

    #[tokio::test]
    async fn test_zero_amount_is_rejected() {
        let fx = fixture();
        let account_id = account(&fx.accounts).await;
        let err = fx
            .commands
            .handle_record_payment(RecordPaymentCommand {
                account_id,
                amount: yen(0),
                description: "nothing".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransaction(_)));
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let fx = fixture();
        let err = fx
            .queries
            .handle_get_balance(GetAccountBalanceQuery {
                account_id: AccountId::generate(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AccountNotFound(_)));
    }
}
