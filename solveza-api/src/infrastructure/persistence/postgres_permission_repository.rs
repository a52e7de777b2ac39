//! # PostgreSQL Permission Repository

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::map_write_error;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::Permission;
use crate::domain::repository::PermissionRepository;
use crate::domain::value_object::PermissionId;

#[derive(sqlx::FromRow)]
struct PermissionRow {
    id: Uuid,
    name: String,
    resource: String,
    action: String,
    created_at: DateTime<Utc>,
}

impl From<PermissionRow> for Permission {
    fn from(row: PermissionRow) -> Self {
        Permission::restore(
            PermissionId::from_uuid(row.id),
            row.name,
            row.resource,
            row.action,
            row.created_at,
        )
    }
}

pub struct PostgresPermissionRepository {
    pool: Arc<PgPool>,
}

impl PostgresPermissionRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionRepository for PostgresPermissionRepository {
    async fn find_by_id(&self, id: PermissionId) -> DomainResult<Option<Permission>> {
        let row: Option<PermissionRow> = sqlx::query_as(
            "SELECT id, name, resource, action, created_at FROM permissions WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .context("Failed to load permission")?;
        Ok(row.map(Permission::from))
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Permission>> {
        let row: Option<PermissionRow> = sqlx::query_as(
            "SELECT id, name, resource, action, created_at FROM permissions WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&*self.pool)
        .await
        .context("Failed to load permission by name")?;
        Ok(row.map(Permission::from))
    }

    async fn find_all(&self) -> DomainResult<Vec<Permission>> {
        let rows: Vec<PermissionRow> = sqlx::query_as(
            "SELECT id, name, resource, action, created_at FROM permissions ORDER BY name",
        )
        .fetch_all(&*self.pool)
        .await
        .context("Failed to load permissions")?;
        Ok(rows.into_iter().map(Permission::from).collect())
    }

    async fn save(&self, permission: &Permission) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO permissions (id, name, resource, action, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                resource = EXCLUDED.resource,
                action = EXCLUDED.action
            "#,
        )
        .bind(permission.id().as_uuid())
        .bind(permission.name())
        .bind(permission.resource())
        .bind(permission.action())
        .bind(permission.created_at())
        .execute(&*self.pool)
        .await
        .map_err(|err| {
            map_write_error(err, "Failed to save permission", || {
                DomainError::invalid_argument(format!(
                    "permission name already exists: {}",
                    permission.name()
                ))
            })
        })?;
        Ok(())
    }

    async fn delete(&self, id: PermissionId) -> DomainResult<()> {
        sqlx::query("DELETE FROM permissions WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .context("Failed to delete permission")?;
        Ok(())
    }

    async fn exists_by_id(&self, id: PermissionId) -> DomainResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM permissions WHERE id = $1)")
                .bind(id.as_uuid())
                .fetch_one(&*self.pool)
                .await
                .context("Failed to check permission existence")?;
        Ok(exists)
    }

    async fn exists_by_name(&self, name: &str) -> DomainResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM permissions WHERE name = $1)")
                .bind(name)
                .fetch_one(&*self.pool)
                .await
                .context("Failed to check permission name")?;
        Ok(exists)
    }
}
