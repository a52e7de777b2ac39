//! # PostgreSQL Role Repository
//!
//! 角色表 `roles` 与关联表 `role_permissions` 的读写

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::map_write_error;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::Role;
use crate::domain::repository::RoleRepository;
use crate::domain::value_object::{PermissionId, RoleId};

#[derive(sqlx::FromRow)]
struct RoleRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl RoleRow {
    fn into_role(self, permission_ids: BTreeSet<PermissionId>) -> Role {
        Role::restore(
            RoleId::from_uuid(self.id),
            self.name,
            self.description,
            permission_ids,
            self.created_at,
        )
    }
}

pub struct PostgresRoleRepository {
    pool: Arc<PgPool>,
}

impl PostgresRoleRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn hydrate(&self, rows: Vec<RoleRow>) -> DomainResult<Vec<Role>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let links = sqlx::query(
            "SELECT role_id, permission_id FROM role_permissions WHERE role_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&*self.pool)
        .await
        .context("Failed to load role permissions")?;

        let mut permissions_by_role: HashMap<Uuid, BTreeSet<PermissionId>> = HashMap::new();
        for link in links {
            let role_id: Uuid = link.get("role_id");
            let permission_id: Uuid = link.get("permission_id");
            permissions_by_role
                .entry(role_id)
                .or_default()
                .insert(PermissionId::from_uuid(permission_id));
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let permission_ids = permissions_by_role.remove(&row.id).unwrap_or_default();
                row.into_role(permission_ids)
            })
            .collect())
    }

    async fn hydrate_one(&self, row: Option<RoleRow>) -> DomainResult<Option<Role>> {
        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.into_iter().next()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn find_by_id(&self, id: RoleId) -> DomainResult<Option<Role>> {
        let row: Option<RoleRow> =
            sqlx::query_as("SELECT id, name, description, created_at FROM roles WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&*self.pool)
                .await
                .context("Failed to load role")?;
        self.hydrate_one(row).await
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Role>> {
        let row: Option<RoleRow> =
            sqlx::query_as("SELECT id, name, description, created_at FROM roles WHERE name = $1")
                .bind(name)
                .fetch_optional(&*self.pool)
                .await
                .context("Failed to load role by name")?;
        self.hydrate_one(row).await
    }

    async fn find_all(&self) -> DomainResult<Vec<Role>> {
        let rows: Vec<RoleRow> =
            sqlx::query_as("SELECT id, name, description, created_at FROM roles ORDER BY name")
                .fetch_all(&*self.pool)
                .await
                .context("Failed to load roles")?;
        self.hydrate(rows).await
    }

    async fn save(&self, role: &Role) -> DomainResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query(
            r#"
            INSERT INTO roles (id, name, description, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description
            "#,
        )
        .bind(role.id().as_uuid())
        .bind(role.name())
        .bind(role.description())
        .bind(role.created_at())
        .execute(&mut *tx)
        .await
        .map_err(|err| {
            map_write_error(err, "Failed to save role", || {
                DomainError::invalid_argument(format!("role name already exists: {}", role.name()))
            })
        })?;

        let current: Vec<Uuid> =
            sqlx::query_scalar("SELECT permission_id FROM role_permissions WHERE role_id = $1")
                .bind(role.id().as_uuid())
                .fetch_all(&mut *tx)
                .await
                .context("Failed to load role permissions")?;
        let current: BTreeSet<Uuid> = current.into_iter().collect();
        let desired: BTreeSet<Uuid> = role
            .permission_ids()
            .into_iter()
            .map(|id| id.as_uuid())
            .collect();

        let revoked: Vec<Uuid> = current.difference(&desired).copied().collect();
        if !revoked.is_empty() {
            sqlx::query(
                "DELETE FROM role_permissions WHERE role_id = $1 AND permission_id = ANY($2)",
            )
            .bind(role.id().as_uuid())
            .bind(&revoked)
            .execute(&mut *tx)
            .await
            .context("Failed to revoke role permissions")?;
        }

        for permission_id in desired.difference(&current) {
            sqlx::query(
                "INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(role.id().as_uuid())
            .bind(permission_id)
            .execute(&mut *tx)
            .await
            .context("Failed to grant role permission")?;
        }

        tx.commit().await.context("Failed to commit role")?;
        Ok(())
    }

    async fn delete(&self, id: RoleId) -> DomainResult<()> {
        sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .context("Failed to delete role")?;
        Ok(())
    }

    async fn exists_by_id(&self, id: RoleId) -> DomainResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM roles WHERE id = $1)")
            .bind(id.as_uuid())
            .fetch_one(&*self.pool)
            .await
            .context("Failed to check role existence")?;
        Ok(exists)
    }

    async fn exists_by_name(&self, name: &str) -> DomainResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM roles WHERE name = $1)")
                .bind(name)
                .fetch_one(&*self.pool)
                .await
                .context("Failed to check role name")?;
        Ok(exists)
    }
}
