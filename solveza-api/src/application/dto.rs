//! 对外返回的数据传输对象（JSON 字段为 camelCase）

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::model::{Account, Permission, Role, Transaction, User};
use crate::domain::value_object::{AccountId, Money};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub provider: String,
    pub external_id: String,
    pub name: String,
    pub email: Option<String>,
    pub role_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().as_uuid(),
            provider: user.provider().to_string(),
            external_id: user.external_id().to_string(),
            name: user.name().to_string(),
            email: user.email().map(str::to_string),
            role_ids: user.role_ids().into_iter().map(|id| id.as_uuid()).collect(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub permission_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<&Role> for RoleDto {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id().as_uuid(),
            name: role.name().to_string(),
            description: role.description().map(str::to_string),
            permission_ids: role
                .permission_ids()
                .into_iter()
                .map(|id| id.as_uuid())
                .collect(),
            created_at: role.created_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionDto {
    pub id: Uuid,
    pub name: String,
    pub resource: String,
    pub action: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Permission> for PermissionDto {
    fn from(permission: &Permission) -> Self {
        Self {
            id: permission.id().as_uuid(),
            name: permission.name().to_string(),
            resource: permission.resource().to_string(),
            action: permission.action().to_string(),
            created_at: permission.created_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub payer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Account> for AccountDto {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id().as_uuid(),
            requester_id: account.requester().user_id().as_uuid(),
            payer_id: account.payer().user_id().as_uuid(),
            created_at: account.created_at(),
            updated_at: account.updated_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub id: Uuid,
    pub account_id: Uuid,
    /// `DEPOSIT` 或 `PAYMENT`
    pub transaction_type: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub executed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<&Transaction> for TransactionDto {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id().as_uuid(),
            account_id: tx.account_id().as_uuid(),
            transaction_type: tx.transaction_type().to_string(),
            amount: tx.amount().amount(),
            currency: tx.amount().currency().to_string(),
            description: tx.description().to_string(),
            executed_at: tx.executed_at(),
            created_at: tx.created_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceDto {
    pub account_id: Uuid,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub currency: String,
}

impl BalanceDto {
    pub fn new(account_id: AccountId, balance: Money) -> Self {
        Self {
            account_id: account_id.as_uuid(),
            amount: balance.amount(),
            currency: balance.currency().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::Currency;

    #[test]
    fn test_amount_keeps_every_digit_as_json_number() {
        let amount: Decimal = "12345678901234567.89".parse().unwrap();
        let account_id = AccountId::generate();
        let dto = BalanceDto::new(account_id, Money::new(amount, Currency::jpy()).unwrap());

        let json = serde_json::to_string(&dto).unwrap();
        assert!(json.contains(r#""amount":12345678901234567.89"#), "{json}");

        let decoded: BalanceDto = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.amount, amount);
    }

    #[test]
    fn test_transaction_amount_keeps_scale() {
        let account_id = AccountId::generate();
        let amount = Money::yen(Decimal::new(250_050, 2)).unwrap();
        let tx = Transaction::create_payment(account_id, amount, "rent").unwrap();

        let value = serde_json::to_value(TransactionDto::from(&tx)).unwrap();
        assert_eq!(value["amount"].to_string(), "2500.50");
        assert_eq!(value["transactionType"], "PAYMENT");
    }
}
