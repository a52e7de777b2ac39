//! OpenAPI 文档

use axum::Json;
use utoipa::OpenApi;

use super::error::ErrorResponse;
use super::handlers::{account, permission, role, transaction, user};
use super::requests::{
    AssignRoleRequest, CreateAccountRequest, CreatePermissionRequest, CreateRoleRequest,
    DefinePermissionsRequest, RecordTransactionRequest, RegisterUserRequest,
};
use crate::application::dto::{
    AccountDto, BalanceDto, PermissionDto, RoleDto, TransactionDto, UserDto,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Solveza API",
        description = "User, role, account and transaction management"
    ),
    paths(
        user::register_user,
        user::get_user,
        user::list_users,
        user::assign_role,
        role::create_role,
        role::get_role,
        role::list_roles,
        role::find_role_by_name,
        role::define_permissions,
        role::delete_role,
        permission::create_permission,
        permission::get_permission,
        permission::list_permissions,
        permission::find_permission_by_name,
        permission::delete_permission,
        account::create_account,
        account::get_account,
        account::list_accounts_by_user,
        account::delete_account,
        transaction::record_deposit,
        transaction::record_payment,
        transaction::transaction_history,
        transaction::account_balance,
    ),
    components(schemas(
        UserDto,
        RoleDto,
        PermissionDto,
        AccountDto,
        TransactionDto,
        BalanceDto,
        ErrorResponse,
        RegisterUserRequest,
        AssignRoleRequest,
        CreateRoleRequest,
        DefinePermissionsRequest,
        CreatePermissionRequest,
        CreateAccountRequest,
        RecordTransactionRequest,
    )),
    tags(
        (name = "users", description = "User registration and role assignment"),
        (name = "roles", description = "Role management"),
        (name = "permissions", description = "Permission management"),
        (name = "accounts", description = "Requester / payer accounts"),
        (name = "transactions", description = "Deposits, payments and balances")
    )
)]
pub struct ApiDoc;

/// HTTP: 返回 OpenAPI 3 JSON 文档
pub async fn api_docs() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/users",
            "/users/{userId}",
            "/users/{userId}/roles",
            "/roles",
            "/roles/{roleId}",
            "/roles/search",
            "/roles/{roleId}/permissions",
            "/permissions",
            "/permissions/{permissionId}",
            "/permissions/search",
            "/accounts",
            "/accounts/{accountId}",
            "/transactions/deposits",
            "/transactions/payments",
            "/transactions/history",
            "/transactions/balance",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn test_document_serializes_to_json() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert!(json["openapi"].as_str().unwrap().starts_with("3."));
        assert!(json["components"]["schemas"]["ErrorResponse"].is_object());
    }
}
