use std::sync::Arc;

use tracing::{debug, info};

use crate::application::commands::{AssignRoleCommand, RegisterUserCommand};
use crate::application::dto::UserDto;
use crate::application::queries::{GetUserQuery, ListUsersQuery};
use crate::domain::errors::DomainResult;
use crate::domain::model::User;
use crate::domain::repository::{UserRepositoryRef, UserSearchCriteria};
use crate::domain::service::UserValidationService;

/// 用户命令处理器
pub struct UserCommandHandler {
    user_repo: UserRepositoryRef,
    validation: Arc<UserValidationService>,
}

impl UserCommandHandler {
    pub fn new(user_repo: UserRepositoryRef, validation: Arc<UserValidationService>) -> Self {
        Self {
            user_repo,
            validation,
        }
    }

    /// 处理注册或更新用户命令
    ///
    /// 已存在相同 provider + external_id 的用户时更新名称与邮箱，否则新建。
    pub async fn handle_register_user(&self, command: RegisterUserCommand) -> DomainResult<UserDto> {
        debug!(
            provider = %command.provider,
            external_id = %command.external_id,
            "Handling register user command"
        );

        let existing = self
            .user_repo
            .find_by_provider_and_external_id(&command.provider, &command.external_id)
            .await?;

        let user = match existing {
            Some(mut user) => {
                user.update_name(&command.name)?;
                user.update_email(command.email);
                self.user_repo.save(&user).await?;
                info!(user_id = %user.id(), "User updated");
                user
            }
            None => {
                let user = User::create(
                    command.provider,
                    &command.external_id,
                    &command.name,
                    command.email,
                )?;
                self.user_repo.save(&user).await?;
                info!(user_id = %user.id(), provider = %user.provider(), "User registered");
                user
            }
        };

        Ok(UserDto::from(&user))
    }

    /// 处理分配角色命令
    pub async fn handle_assign_role(&self, command: AssignRoleCommand) -> DomainResult<()> {
        debug!(
            user_id = %command.user_id,
            role_id = %command.role_id,
            "Handling assign role command"
        );

        let mut user = self.validation.validate_user_exists(command.user_id).await?;
        self.validation.validate_role_exists(command.role_id).await?;

        user.assign_role(command.role_id);
        self.user_repo.save(&user).await?;

        info!(user_id = %command.user_id, role_id = %command.role_id, "Role assigned");
        Ok(())
    }
}

/// 用户查询处理器
pub struct UserQueryHandler {
    user_repo: UserRepositoryRef,
    validation: Arc<UserValidationService>,
}

impl UserQueryHandler {
    pub fn new(user_repo: UserRepositoryRef, validation: Arc<UserValidationService>) -> Self {
        Self {
            user_repo,
            validation,
        }
    }

    pub async fn handle_get_user(&self, query: GetUserQuery) -> DomainResult<UserDto> {
        debug!(user_id = %query.user_id, "Handling get user query");
        let user = self.validation.validate_user_exists(query.user_id).await?;
        Ok(UserDto::from(&user))
    }

    pub async fn handle_list_users(&self, query: ListUsersQuery) -> DomainResult<Vec<UserDto>> {
        debug!(
            provider = ?query.provider,
            external_id = ?query.external_id,
            "Handling list users query"
        );
        let criteria = UserSearchCriteria {
            provider: query.provider,
            external_id: query.external_id,
        };
        let users = self.user_repo.find_by_criteria(&criteria).await?;
        Ok(users.iter().map(UserDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use crate::domain::model::Role;
    use crate::domain::repository::RoleRepository;
    use crate::domain::value_object::{Provider, RoleId, UserId};
    use crate::infrastructure::memory::{
        InMemoryDatabase, InMemoryPermissionRepository, InMemoryRoleRepository,
        InMemoryUserRepository,
    };

    struct Fixture {
        commands: UserCommandHandler,
        queries: UserQueryHandler,
        roles: Arc<InMemoryRoleRepository>,
    }

    fn fixture() -> Fixture {
        let db = InMemoryDatabase::new();
        let users: UserRepositoryRef = Arc::new(InMemoryUserRepository::with_database(db.clone()));
        let roles = Arc::new(InMemoryRoleRepository::with_database(db.clone()));
        let permissions = Arc::new(InMemoryPermissionRepository::with_database(db));
        let validation = Arc::new(UserValidationService::new(
            users.clone(),
            roles.clone(),
            permissions,
        ));
        Fixture {
            commands: UserCommandHandler::new(users.clone(), validation.clone()),
            queries: UserQueryHandler::new(users, validation),
            roles,
        }
    }

    fn register(name: &str, email: Option<&str>) -> RegisterUserCommand {
        RegisterUserCommand {
            provider: Provider::google(),
            external_id: "google-123".to_string(),
            name: name.to_string(),
            email: email.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_register_is_idempotent_per_external_identity() {
        let fx = fixture();
        let first = fx
            .commands
            .handle_register_user(register("Taro", Some("taro@example.com")))
            .await
            .unwrap();
        let second = fx
            .commands
            .handle_register_user(register("Taro Yamada", None))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "Taro Yamada");
        assert_eq!(second.email, None);
        assert_eq!(second.created_at, first.created_at);

        let all = fx
            .queries
            .handle_list_users(ListUsersQuery::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_assign_role_requires_existing_role() {
        let fx = fixture();
        let user = fx
            .commands
            .handle_register_user(register("Taro", None))
            .await
            .unwrap();

        let err = fx
            .commands
            .handle_assign_role(AssignRoleCommand {
                user_id: UserId::from_uuid(user.id),
                role_id: RoleId::generate(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));

        let role = Role::create("admin", None).unwrap();
        fx.roles.save(&role).await.unwrap();
        fx.commands
            .handle_assign_role(AssignRoleCommand {
                user_id: UserId::from_uuid(user.id),
                role_id: role.id(),
            })
            .await
            .unwrap();

        let reloaded = fx
            .queries
            .handle_get_user(GetUserQuery {
                user_id: UserId::from_uuid(user.id),
            })
            .await
            .unwrap();
        assert_eq!(reloaded.role_ids, vec![role.id().as_uuid()]);
    }

    #[tokio::test]
    async fn test_assign_role_to_unknown_user() {
        let fx = fixture();
        let err = fx
            .commands
            .handle_assign_role(AssignRoleCommand {
                user_id: UserId::generate(),
                role_id: RoleId::generate(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound(_)));
    }
}
