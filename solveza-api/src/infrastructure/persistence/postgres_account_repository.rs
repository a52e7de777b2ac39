//! # PostgreSQL Account Repository

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::map_write_error;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::{Account, Payer, Requester};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{AccountId, UserId};

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    requester_id: Uuid,
    payer_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account::restore(
            AccountId::from_uuid(row.id),
            Requester::new(UserId::from_uuid(row.requester_id)),
            Payer::new(UserId::from_uuid(row.payer_id)),
            row.created_at,
            row.updated_at,
        )
    }
}

pub struct PostgresAccountRepository {
    pool: Arc<PgPool>,
}

impl PostgresAccountRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_by_id(&self, id: AccountId) -> DomainResult<Option<Account>> {
        let row: Option<AccountRow> = sqlx::query_as(
            "SELECT id, requester_id, payer_id, created_at, updated_at FROM accounts WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .context("Failed to load account")?;
        Ok(row.map(Account::from))
    }

    async fn find_by_user_id(&self, user_id: UserId) -> DomainResult<Vec<Account>> {
        let rows: Vec<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, requester_id, payer_id, created_at, updated_at
            FROM accounts
            WHERE requester_id = $1 OR payer_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .context("Failed to load accounts by user")?;
        Ok(rows.into_iter().map(Account::from).collect())
    }

    async fn save(&self, account: &Account) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, requester_id, payer_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                requester_id = EXCLUDED.requester_id,
                payer_id = EXCLUDED.payer_id,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(account.id().as_uuid())
        .bind(account.requester().user_id().as_uuid())
        .bind(account.payer().user_id().as_uuid())
        .bind(account.created_at())
        .bind(account.updated_at())
        .execute(&*self.pool)
        .await
        .map_err(|err| {
            map_write_error(err, "Failed to save account", || {
                DomainError::DuplicateAccount(format!(
                    "account already exists for requester {} and payer {}",
                    account.requester().user_id(),
                    account.payer().user_id()
                ))
            })
        })?;
        Ok(())
    }

    async fn delete(&self, id: AccountId) -> DomainResult<()> {
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .context("Failed to delete account")?;
        Ok(())
    }

    async fn exists_by_id(&self, id: AccountId) -> DomainResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1)")
                .bind(id.as_uuid())
                .fetch_one(&*self.pool)
                .await
                .context("Failed to check account existence")?;
        Ok(exists)
    }

    async fn exists_by_requester_and_payer(
        &self,
        requester_id: UserId,
        payer_id: UserId,
    ) -> DomainResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE requester_id = $1 AND payer_id = $2)",
        )
        .bind(requester_id.as_uuid())
        .bind(payer_id.as_uuid())
        .fetch_one(&*self.pool)
        .await
        .context("Failed to check requester/payer pair")?;
        Ok(exists)
    }
}
