//! 用户管理相关的存在性与唯一性校验

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::{Permission, Role, User};
use crate::domain::repository::{PermissionRepositoryRef, RoleRepositoryRef, UserRepositoryRef};
use crate::domain::value_object::{PermissionId, RoleId, UserId};

pub struct UserValidationService {
    user_repo: UserRepositoryRef,
    role_repo: RoleRepositoryRef,
    permission_repo: PermissionRepositoryRef,
}

impl UserValidationService {
    pub fn new(
        user_repo: UserRepositoryRef,
        role_repo: RoleRepositoryRef,
        permission_repo: PermissionRepositoryRef,
    ) -> Self {
        Self {
            user_repo,
            role_repo,
            permission_repo,
        }
    }

    pub async fn validate_user_exists(&self, user_id: UserId) -> DomainResult<User> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id.to_string()))
    }

    pub async fn validate_role_exists(&self, role_id: RoleId) -> DomainResult<Role> {
        self.role_repo
            .find_by_id(role_id)
            .await?
            .ok_or_else(|| DomainError::invalid_argument(format!("role not found: {role_id}")))
    }

    pub async fn validate_permission_exists(
        &self,
        permission_id: PermissionId,
    ) -> DomainResult<Permission> {
        self.permission_repo
            .find_by_id(permission_id)
            .await?
            .ok_or_else(|| {
                DomainError::invalid_argument(format!("permission not found: {permission_id}"))
            })
    }

    pub async fn validate_role_name_available(&self, name: &str) -> DomainResult<()> {
        if self.role_repo.exists_by_name(name).await? {
            return Err(DomainError::invalid_argument(format!(
                "role name already exists: {name}"
            )));
        }
        Ok(())
    }

    pub async fn validate_permission_name_available(&self, name: &str) -> DomainResult<()> {
        if self.permission_repo.exists_by_name(name).await? {
            return Err(DomainError::invalid_argument(format!(
                "permission name already exists: {name}"
            )));
        }
        Ok(())
    }
}
