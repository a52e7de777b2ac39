//! 账户余额计算

use rust_decimal::Decimal;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::Transaction;
use crate::domain::repository::TransactionRepositoryRef;
use crate::domain::value_object::{AccountId, Currency, Money};

pub struct AccountBalanceService {
    transaction_repo: TransactionRepositoryRef,
}

impl AccountBalanceService {
    pub fn new(transaction_repo: TransactionRepositoryRef) -> Self {
        Self { transaction_repo }
    }

    pub async fn calculate_balance(&self, account_id: AccountId) -> DomainResult<Money> {
        let transactions = self.transaction_repo.find_by_account_id(account_id).await?;
        Self::balance_of(&transactions)
    }

    /// 入金合计减去付款合计，币种取最早一笔交易的币种，结果不低于零。
    /// 没有交易时余额为 0 JPY。
    pub fn balance_of(transactions: &[Transaction]) -> DomainResult<Money> {
        let Some(first) = transactions.first() else {
            return Ok(Money::zero(Currency::jpy()));
        };

        let total = transactions
            .iter()
            .try_fold(Decimal::ZERO, |acc, tx| {
                if tx.is_deposit() {
                    acc.checked_add(tx.amount().amount())
                } else {
                    acc.checked_sub(tx.amount().amount())
                }
            })
            .ok_or_else(|| {
                DomainError::invalid_transaction(format!(
                    "balance of account {} exceeds the supported range",
                    first.account_id()
                ))
            })?;

        Money::new(total.max(Decimal::ZERO), first.amount().currency())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yen(amount: i64) -> Money {
        Money::yen(Decimal::new(amount, 0)).unwrap()
    }

    #[test]
    fn test_empty_history_is_zero_yen() {
        let balance = AccountBalanceService::balance_of(&[]).unwrap();
        assert!(balance.is_zero());
        assert_eq!(balance.currency(), Currency::jpy());
    }

    #[test]
    fn test_deposits_minus_payments() {
        let account = AccountId::generate();
        let txs = vec![
            Transaction::create_deposit(account, yen(10_000), "salary").unwrap(),
            Transaction::create_payment(account, yen(2_500), "rent").unwrap(),
            Transaction::create_deposit(account, yen(500), "refund").unwrap(),
        ];
        let balance = AccountBalanceService::balance_of(&txs).unwrap();
        assert_eq!(balance.amount(), Decimal::new(8_000, 0));
    }

    #[test]
    fn test_overdrawn_balance_is_clamped() {
        let account = AccountId::generate();
        let txs = vec![
            Transaction::create_deposit(account, yen(100), "deposit").unwrap(),
            Transaction::create_payment(account, yen(300), "payment").unwrap(),
        ];
        let balance = AccountBalanceService::balance_of(&txs).unwrap();
        assert!(balance.is_zero());
    }

    #[test]
    fn test_overflowing_total_is_an_error() {
        let account = AccountId::generate();
        let huge = Money::yen(Decimal::MAX).unwrap();
        let txs = vec![
            Transaction::create_deposit(account, huge, "first").unwrap(),
            Transaction::create_deposit(account, huge, "second").unwrap(),
        ];
        let err = AccountBalanceService::balance_of(&txs).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransaction(_)), "{err:?}");
    }

    #[test]
    fn test_currency_follows_first_transaction() {
        let account = AccountId::generate();
        let usd: Currency = "USD".parse().unwrap();
        let txs = vec![
            Transaction::create_deposit(account, Money::new(Decimal::new(50, 0), usd).unwrap(), "usd")
                .unwrap(),
            Transaction::create_deposit(account, yen(10), "yen").unwrap(),
        ];
        let balance = AccountBalanceService::balance_of(&txs).unwrap();
        assert_eq!(balance.currency(), usd);
        assert_eq!(balance.amount(), Decimal::new(60, 0));
    }
}
