//! 记账前的校验

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::Account;
use crate::domain::repository::AccountRepositoryRef;
use crate::domain::value_object::{AccountId, Money};

pub struct TransactionValidationService {
    account_repo: AccountRepositoryRef,
}

impl TransactionValidationService {
    pub fn new(account_repo: AccountRepositoryRef) -> Self {
        Self { account_repo }
    }

    pub async fn validate_account_exists(&self, account_id: AccountId) -> DomainResult<Account> {
        self.account_repo
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| DomainError::AccountNotFound(account_id.to_string()))
    }

    /// 交易金额必须大于零
    pub fn validate_transaction_amount(&self, amount: &Money) -> DomainResult<()> {
        if !amount.is_positive() {
            return Err(DomainError::invalid_transaction(format!(
                "transaction amount must be positive: {amount}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use super::*;
    use crate::infrastructure::memory::InMemoryAccountRepository;

    fn service() -> TransactionValidationService {
        TransactionValidationService::new(Arc::new(InMemoryAccountRepository::new()))
    }

    #[test]
    fn test_zero_amount_is_invalid_transaction() {
        let err = service()
            .validate_transaction_amount(&Money::yen(Decimal::ZERO).unwrap())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransaction(_)));
    }

    #[test]
    fn test_positive_amount_accepted() {
        assert!(
            service()
                .validate_transaction_amount(&Money::yen(Decimal::new(1, 2)).unwrap())
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let err = service()
            .validate_account_exists(AccountId::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AccountNotFound(_)));
    }
}
