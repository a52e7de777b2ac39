use std::sync::Arc;

use tracing::{debug, info};

use crate::application::commands::{
    CreateRoleCommand, DefineRolePermissionsCommand, DeleteRoleCommand,
};
use crate::application::dto::RoleDto;
use crate::application::queries::{FindRoleByNameQuery, GetRoleQuery};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::Role;
use crate::domain::repository::RoleRepositoryRef;
use crate::domain::service::UserValidationService;

/// 角色命令处理器
pub struct RoleCommandHandler {
    role_repo: RoleRepositoryRef,
    validation: Arc<UserValidationService>,
}

impl RoleCommandHandler {
    pub fn new(role_repo: RoleRepositoryRef, validation: Arc<UserValidationService>) -> Self {
        Self {
            role_repo,
            validation,
        }
    }

    pub async fn handle_create_role(&self, command: CreateRoleCommand) -> DomainResult<RoleDto> {
        debug!(name = %command.name, "Handling create role command");

        let role = Role::create(&command.name, command.description)?;
        self.validation
            .validate_role_name_available(role.name())
            .await?;
        self.role_repo.save(&role).await?;

        info!(role_id = %role.id(), name = %role.name(), "Role created");
        Ok(RoleDto::from(&role))
    }

    /// 用给定集合整体替换角色权限，所有权限必须存在
    pub async fn handle_define_permissions(
        &self,
        command: DefineRolePermissionsCommand,
    ) -> DomainResult<()> {
        debug!(
            role_id = %command.role_id,
            count = command.permission_ids.len(),
            "Handling define role permissions command"
        );

        let mut role = self.validation.validate_role_exists(command.role_id).await?;
        for permission_id in &command.permission_ids {
            self.validation
                .validate_permission_exists(*permission_id)
                .await?;
        }

        role.replace_permissions(command.permission_ids);
        self.role_repo.save(&role).await?;

        info!(role_id = %command.role_id, "Role permissions defined");
        Ok(())
    }

    pub async fn handle_delete_role(&self, command: DeleteRoleCommand) -> DomainResult<()> {
        debug!(role_id = %command.role_id, "Handling delete role command");

        self.validation.validate_role_exists(command.role_id).await?;
        self.role_repo.delete(command.role_id).await?;

        info!(role_id = %command.role_id, "Role deleted");
        Ok(())
    }
}

/// 角色查询处理器
pub struct RoleQueryHandler {
    role_repo: RoleRepositoryRef,
    validation: Arc<UserValidationService>,
}

impl RoleQueryHandler {
    pub fn new(role_repo: RoleRepositoryRef, validation: Arc<UserValidationService>) -> Self {
        Self {
            role_repo,
            validation,
        }
    }

    pub async fn handle_get_role(&self, query: GetRoleQuery) -> DomainResult<RoleDto> {
        debug!(role_id = %query.role_id, "Handling get role query");
        let role = self.validation.validate_role_exists(query.role_id).await?;
        Ok(RoleDto::from(&role))
    }

    pub async fn handle_find_by_name(&self, query: FindRoleByNameQuery) -> DomainResult<RoleDto> {
        debug!(name = %query.name, "Handling find role by name query");
        let role = self
            .role_repo
            .find_by_name(&query.name)
            .await?
            .ok_or_else(|| {
                DomainError::invalid_argument(format!("role not found: {}", query.name))
            })?;
        Ok(RoleDto::from(&role))
    }

    pub async fn handle_list_roles(&self) -> DomainResult<Vec<RoleDto>> {
        debug!("Handling list roles query");
        let roles = self.role_repo.find_all().await?;
        Ok(roles.iter().map(RoleDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::domain::model::Permission;
    use crate::domain::repository::PermissionRepository;
    use crate::domain::value_object::PermissionId;
    use crate::infrastructure::memory::{
        InMemoryDatabase, InMemoryPermissionRepository, InMemoryRoleRepository,
        InMemoryUserRepository,
    };

    struct Fixture {
        commands: RoleCommandHandler,
        queries: RoleQueryHandler,
        permissions: Arc<InMemoryPermissionRepository>,
    }

    fn fixture() -> Fixture {
        let db = InMemoryDatabase::new();
        let roles: RoleRepositoryRef = Arc::new(InMemoryRoleRepository::with_database(db.clone()));
        let permissions = Arc::new(InMemoryPermissionRepository::with_database(db.clone()));
        let validation = Arc::new(UserValidationService::new(
            Arc::new(InMemoryUserRepository::with_database(db)),
            roles.clone(),
            permissions.clone(),
        ));
        Fixture {
            commands: RoleCommandHandler::new(roles.clone(), validation.clone()),
            queries: RoleQueryHandler::new(roles, validation),
            permissions,
        }
    }

    fn create(name: &str) -> CreateRoleCommand {
        CreateRoleCommand {
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_role_name_rejected() {
        let fx = fixture();
        fx.commands.handle_create_role(create("admin")).await.unwrap();
        let err = fx
            .commands
            .handle_create_role(create("admin"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_define_permissions_replaces_set() {
        let fx = fixture();
        let role = fx.commands.handle_create_role(create("editor")).await.unwrap();
        let read = Permission::create("doc:read", "doc", "read").unwrap();
        let write = Permission::create("doc:write", "doc", "write").unwrap();
        fx.permissions.save(&read).await.unwrap();
        fx.permissions.save(&write).await.unwrap();

        let role_id = crate::domain::value_object::RoleId::from_uuid(role.id);
        fx.commands
            .handle_define_permissions(DefineRolePermissionsCommand {
                role_id,
                permission_ids: BTreeSet::from([read.id(), write.id()]),
            })
            .await
            .unwrap();
        fx.commands
            .handle_define_permissions(DefineRolePermissionsCommand {
                role_id,
                permission_ids: BTreeSet::from([write.id()]),
            })
            .await
            .unwrap();

        let reloaded = fx.queries.handle_get_role(GetRoleQuery { role_id }).await.unwrap();
        assert_eq!(reloaded.permission_ids, vec![write.id().as_uuid()]);
    }

    #[tokio::test]
    async fn test_define_permissions_rejects_unknown_permission() {
        let fx = fixture();
        let role = fx.commands.handle_create_role(create("viewer")).await.unwrap();
        let err = fx
            .commands
            .handle_define_permissions(DefineRolePermissionsCommand {
                role_id: crate::domain::value_object::RoleId::from_uuid(role.id),
                permission_ids: BTreeSet::from([PermissionId::generate()]),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(msg) if msg.starts_with("permission not found")));
    }

    #[tokio::test]
    async fn test_find_by_name_and_list_sorted() {
        let fx = fixture();
        fx.commands.handle_create_role(create("viewer")).await.unwrap();
        fx.commands.handle_create_role(create("admin")).await.unwrap();

        let names: Vec<String> = fx
            .queries
            .handle_list_roles()
            .await
            .unwrap()
            .into_iter()
            .map(|role| role.name)
            .collect();
        assert_eq!(names, vec!["admin", "viewer"]);

        let admin = fx
            .queries
            .handle_find_by_name(FindRoleByNameQuery {
                name: "admin".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(admin.name, "admin");
        assert!(
            fx.queries
                .handle_find_by_name(FindRoleByNameQuery {
                    name: "missing".to_string()
                })
                .await
                .is_err()
        );
    }
}
