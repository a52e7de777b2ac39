use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::require_non_blank;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_object::{AccountId, Money, TransactionId};

/// 交易类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Deposit,
    Payment,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Payment => "PAYMENT",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "Deposit",
            TransactionType::Payment => "Payment",
        }
    }
}

impl FromStr for TransactionType {
    type Err = DomainError;

    fn from_str(value: &str) -> DomainResult<Self> {
        match value {
            "DEPOSIT" => Ok(TransactionType::Deposit),
            "PAYMENT" => Ok(TransactionType::Payment),
            other => Err(DomainError::invalid_argument(format!(
                "unknown transaction type: {other}"
            ))),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 账户上的一笔入金或付款
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    id: TransactionId,
    account_id: AccountId,
    transaction_type: TransactionType,
    amount: Money,
    description: String,
    executed_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn create_deposit(
        account_id: AccountId,
        amount: Money,
        description: &str,
    ) -> DomainResult<Self> {
        Self::create(account_id, TransactionType::Deposit, amount, description)
    }

    pub fn create_payment(
        account_id: AccountId,
        amount: Money,
        description: &str,
    ) -> DomainResult<Self> {
        Self::create(account_id, TransactionType::Payment, amount, description)
    }

    fn create(
        account_id: AccountId,
        transaction_type: TransactionType,
        amount: Money,
        description: &str,
    ) -> DomainResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id: TransactionId::generate(),
            account_id,
            transaction_type,
            amount,
            description: require_non_blank(description, "description")?,
            executed_at: now,
            created_at: now,
        })
    }

    pub fn restore(
        id: TransactionId,
        account_id: AccountId,
        transaction_type: TransactionType,
        amount: Money,
        description: String,
        executed_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            account_id,
            transaction_type,
            amount,
            description,
            executed_at,
            created_at,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn executed_at(&self) -> DateTime<Utc> {
        self.executed_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_deposit(&self) -> bool {
        self.transaction_type == TransactionType::Deposit
    }

    pub fn is_payment(&self) -> bool {
        self.transaction_type == TransactionType::Payment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_transaction_type_parsing() {
        assert_eq!("DEPOSIT".parse::<TransactionType>().unwrap(), TransactionType::Deposit);
        assert_eq!(TransactionType::Payment.to_string(), "PAYMENT");
        assert_eq!(TransactionType::Payment.display_name(), "Payment");
        assert!("deposit".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_description_is_trimmed() {
        let amount = Money::yen(Decimal::new(1000, 0)).unwrap();
        let tx = Transaction::create_deposit(AccountId::generate(), amount, "  salary ").unwrap();
        assert_eq!(tx.description(), "salary");
        assert!(tx.is_deposit());
        assert!(!tx.is_payment());
    }

    #[test]
    fn test_blank_description_rejected() {
        let amount = Money::yen(Decimal::ONE).unwrap();
        assert!(Transaction::create_payment(AccountId::generate(), amount, "  ").is_err());
    }
}
