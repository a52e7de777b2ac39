//! # PostgreSQL Transaction Repository

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::{Transaction, TransactionType};
use crate::domain::repository::TransactionRepository;
use crate::domain::value_object::{AccountId, Currency, Money, TransactionId};

const TRANSACTION_COLUMNS: &str =
    "id, account_id, transaction_type, amount, currency, description, executed_at, created_at";

#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    account_id: Uuid,
    transaction_type: String,
    amount: Decimal,
    currency: String,
    description: String,
    executed_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = DomainError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let transaction_type: TransactionType = row.transaction_type.parse()?;
        let currency: Currency = row.currency.parse()?;
        Ok(Transaction::restore(
            TransactionId::from_uuid(row.id),
            AccountId::from_uuid(row.account_id),
            transaction_type,
            Money::new(row.amount, currency)?,
            row.description,
            row.executed_at,
            row.created_at,
        ))
    }
}

pub struct PostgresTransactionRepository {
    pool: Arc<PgPool>,
}

impl PostgresTransactionRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn save(&self, transaction: &Transaction) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions
                (id, account_id, transaction_type, amount, currency, description, executed_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(transaction.id().as_uuid())
        .bind(transaction.account_id().as_uuid())
        .bind(transaction.transaction_type().as_str())
        .bind(transaction.amount().amount())
        .bind(transaction.amount().currency().as_str())
        .bind(transaction.description())
        .bind(transaction.executed_at())
        .bind(transaction.created_at())
        .execute(&*self.pool)
        .await
        .context("Failed to save transaction")?;
        Ok(())
    }

    async fn find_by_id(&self, id: TransactionId) -> DomainResult<Option<Transaction>> {
        let row: Option<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .context("Failed to load transaction")?;
        row.map(Transaction::try_from).transpose()
    }

    async fn find_by_account_id(&self, account_id: AccountId) -> DomainResult<Vec<Transaction>> {
        let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions
            WHERE account_id = $1
            ORDER BY executed_at, created_at, id
            "#
        ))
        .bind(account_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .context("Failed to load account transactions")?;
        rows.into_iter().map(Transaction::try_from).collect()
    }
}
