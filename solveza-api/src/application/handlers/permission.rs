use std::sync::Arc;

use tracing::{debug, info};

use crate::application::commands::{CreatePermissionCommand, DeletePermissionCommand};
use crate::application::dto::PermissionDto;
use crate::application::queries::{FindPermissionByNameQuery, GetPermissionQuery};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::Permission;
use crate::domain::repository::PermissionRepositoryRef;
use crate::domain::service::UserValidationService;

/// 权限命令处理器
pub struct PermissionCommandHandler {
    permission_repo: PermissionRepositoryRef,
    validation: Arc<UserValidationService>,
}

impl PermissionCommandHandler {
    pub fn new(
        permission_repo: PermissionRepositoryRef,
        validation: Arc<UserValidationService>,
    ) -> Self {
        Self {
            permission_repo,
            validation,
        }
    }

    pub async fn handle_create_permission(
        &self,
        command: CreatePermissionCommand,
    ) -> DomainResult<PermissionDto> {
        debug!(
            name = %command.name,
            resource = %command.resource,
            action = %command.action,
            "Handling create permission command"
        );

        let permission = Permission::create(&command.name, &command.resource, &command.action)?;
        self.validation
            .validate_permission_name_available(permission.name())
            .await?;
        self.permission_repo.save(&permission).await?;

        info!(permission_id = %permission.id(), name = %permission.name(), "Permission created");
        Ok(PermissionDto::from(&permission))
    }

    pub async fn handle_delete_permission(
        &self,
        command: DeletePermissionCommand,
    ) -> DomainResult<()> {
        debug!(permission_id = %command.permission_id, "Handling delete permission command");

        self.validation
            .validate_permission_exists(command.permission_id)
            .await?;
        self.permission_repo.delete(command.permission_id).await?;

        info!(permission_id = %command.permission_id, "Permission deleted");
        Ok(())
    }
}

/// 权限查询处理器
pub struct PermissionQueryHandler {
    permission_repo: PermissionRepositoryRef,
    validation: Arc<UserValidationService>,
}

impl PermissionQueryHandler {
    pub fn new(
        permission_repo: PermissionRepositoryRef,
        validation: Arc<UserValidationService>,
    ) -> Self {
        Self {
            permission_repo,
            validation,
        }
    }

    pub async fn handle_get_permission(
        &self,
        query: GetPermissionQuery,
    ) -> DomainResult<PermissionDto> {
        debug!(permission_id = %query.permission_id, "Handling get permission query");
        let permission = self
            .validation
            .validate_permission_exists(query.permission_id)
            .await?;
        Ok(PermissionDto::from(&permission))
    }

    pub async fn handle_find_by_name(
        &self,
        query: FindPermissionByNameQuery,
    ) -> DomainResult<PermissionDto> {
        debug!(name = %query.name, "Handling find permission by name query");
        let permission = self
            .permission_repo
            .find_by_name(&query.name)
            .await?
            .ok_or_else(|| {
                DomainError::invalid_argument(format!("permission not found: {}", query.name))
            })?;
        Ok(PermissionDto::from(&permission))
    }

    pub async fn handle_list_permissions(&self) -> DomainResult<Vec<PermissionDto>> {
        debug!("Handling list permissions query");
        let permissions = self.permission_repo.find_all().await?;
        Ok(permissions.iter().map(PermissionDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::PermissionId;
    use crate::infrastructure::memory::{
        InMemoryDatabase, InMemoryPermissionRepository, InMemoryRoleRepository,
        InMemoryUserRepository,
    };

    fn handlers() -> (PermissionCommandHandler, PermissionQueryHandler) {
        let db = InMemoryDatabase::new();
        let permissions: PermissionRepositoryRef =
            Arc::new(InMemoryPermissionRepository::with_database(db.clone()));
        let validation = Arc::new(UserValidationService::new(
            Arc::new(InMemoryUserRepository::with_database(db.clone())),
            Arc::new(InMemoryRoleRepository::with_database(db)),
            permissions.clone(),
        ));
        (
            PermissionCommandHandler::new(permissions.clone(), validation.clone()),
            PermissionQueryHandler::new(permissions, validation),
        )
    }

    fn create(name: &str) -> CreatePermissionCommand {
        CreatePermissionCommand {
            name: name.to_string(),
            resource: "account".to_string(),
            action: "read".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_get_and_delete() {
        let (commands, queries) = handlers();
        let created = commands
            .handle_create_permission(create("account:read"))
            .await
            .unwrap();
        let permission_id = PermissionId::from_uuid(created.id);

        let fetched = queries
            .handle_get_permission(GetPermissionQuery { permission_id })
            .await
            .unwrap();
        assert_eq!(fetched, created);

        commands
            .handle_delete_permission(DeletePermissionCommand { permission_id })
            .await
            .unwrap();
        assert!(queries.handle_list_permissions().await.unwrap().is_empty());

        let err = commands
            .handle_delete_permission(DeletePermissionCommand { permission_id })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let (commands, _) = handlers();
        commands
            .handle_create_permission(create("account:read"))
            .await
            .unwrap();
        assert!(
            commands
                .handle_create_permission(create("account:read"))
                .await
                .is_err()
        );
    }
}
