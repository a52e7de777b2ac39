//! # PostgreSQL User Repository
//!
//! 用户表 `users` 与关联表 `user_roles` 的读写

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::map_write_error;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::User;
use crate::domain::repository::{UserRepository, UserSearchCriteria};
use crate::domain::value_object::{Provider, RoleId, UserId};

const USER_COLUMNS: &str = "id, provider, external_id, name, email, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    provider: String,
    external_id: String,
    name: String,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self, role_ids: BTreeSet<RoleId>) -> DomainResult<User> {
        Ok(User::restore(
            UserId::from_uuid(self.id),
            Provider::new(self.provider)?,
            self.external_id,
            self.name,
            self.email,
            role_ids,
            self.created_at,
            self.updated_at,
        ))
    }
}

pub struct PostgresUserRepository {
    pool: Arc<PgPool>,
}

impl PostgresUserRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn load_role_ids(&self, user_id: Uuid) -> DomainResult<BTreeSet<RoleId>> {
        let role_ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT role_id FROM user_roles WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&*self.pool)
                .await
                .context("Failed to load user roles")?;
        Ok(role_ids.into_iter().map(RoleId::from_uuid).collect())
    }

    async fn hydrate_one(&self, row: Option<UserRow>) -> DomainResult<Option<User>> {
        match row {
            Some(row) => {
                let role_ids = self.load_role_ids(row.id).await?;
                Ok(Some(row.into_user(role_ids)?))
            }
            None => Ok(None),
        }
    }

    /// 一次查询批量加载多个用户的角色
    async fn hydrate_many(&self, rows: Vec<UserRow>) -> DomainResult<Vec<User>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let links = sqlx::query("SELECT user_id, role_id FROM user_roles WHERE user_id = ANY($1)")
            .bind(&ids)
            .fetch_all(&*self.pool)
            .await
            .context("Failed to load user roles")?;

        let mut roles_by_user: HashMap<Uuid, BTreeSet<RoleId>> = HashMap::new();
        for link in links {
            let user_id: Uuid = link.get("user_id");
            let role_id: Uuid = link.get("role_id");
            roles_by_user
                .entry(user_id)
                .or_default()
                .insert(RoleId::from_uuid(role_id));
        }

        rows.into_iter()
            .map(|row| {
                let role_ids = roles_by_user.remove(&row.id).unwrap_or_default();
                row.into_user(role_ids)
            })
            .collect()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&*self.pool)
                .await
                .context("Failed to load user")?;
        self.hydrate_one(row).await
    }

    async fn find_by_provider_and_external_id(
        &self,
        provider: &Provider,
        external_id: &str,
    ) -> DomainResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE provider = $1 AND external_id = $2"
        ))
        .bind(provider.as_str())
        .bind(external_id)
        .fetch_optional(&*self.pool)
        .await
        .context("Failed to load user by provider")?;
        self.hydrate_one(row).await
    }

    async fn find_by_criteria(&self, criteria: &UserSearchCriteria) -> DomainResult<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE ($1::VARCHAR IS NULL OR provider = $1)
              AND ($2::VARCHAR IS NULL OR external_id = $2)
            ORDER BY created_at, id
            "#
        ))
        .bind(criteria.provider.as_ref().map(Provider::as_str))
        .bind(criteria.external_id.as_deref())
        .fetch_all(&*self.pool)
        .await
        .context("Failed to search users")?;
        self.hydrate_many(rows).await
    }

    async fn save(&self, user: &User) -> DomainResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query(
            r#"
            INSERT INTO users (id, provider, external_id, name, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                provider = EXCLUDED.provider,
                external_id = EXCLUDED.external_id,
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.provider().as_str())
        .bind(user.external_id())
        .bind(user.name())
        .bind(user.email())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|err| {
            map_write_error(err, "Failed to save user", || {
                DomainError::invalid_argument(format!(
                    "user already exists for provider {} and external id {}",
                    user.provider(),
                    user.external_id()
                ))
            })
        })?;

        let current: Vec<Uuid> =
            sqlx::query_scalar("SELECT role_id FROM user_roles WHERE user_id = $1")
                .bind(user.id().as_uuid())
                .fetch_all(&mut *tx)
                .await
                .context("Failed to load user roles")?;
        let current: BTreeSet<Uuid> = current.into_iter().collect();
        let desired: BTreeSet<Uuid> = user.role_ids().into_iter().map(|id| id.as_uuid()).collect();

        let removed: Vec<Uuid> = current.difference(&desired).copied().collect();
        if !removed.is_empty() {
            sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = ANY($2)")
                .bind(user.id().as_uuid())
                .bind(&removed)
                .execute(&mut *tx)
                .await
                .context("Failed to remove user roles")?;
        }

        for role_id in desired.difference(&current) {
            sqlx::query(
                "INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(user.id().as_uuid())
            .bind(role_id)
            .execute(&mut *tx)
            .await
            .context("Failed to assign user role")?;
        }

        tx.commit().await.context("Failed to commit user")?;
        Ok(())
    }

    async fn exists_by_id(&self, id: UserId) -> DomainResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id.as_uuid())
            .fetch_one(&*self.pool)
            .await
            .context("Failed to check user existence")?;
        Ok(exists)
    }
}
