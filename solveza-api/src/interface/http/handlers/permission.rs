//! 权限管理接口

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use super::role::NameSearchParams;
use crate::application::commands::DeletePermissionCommand;
use crate::application::dto::PermissionDto;
use crate::application::queries::{FindPermissionByNameQuery, GetPermissionQuery};
use crate::domain::value_object::PermissionId;
use crate::interface::http::error::{ApiError, ErrorResponse};
use crate::interface::http::extract::{json_body, parse_param, required_param};
use crate::interface::http::requests::CreatePermissionRequest;
use crate::interface::http::state::AppState;

#[utoipa::path(
    post,
    path = "/permissions",
    tag = "permissions",
    request_body = CreatePermissionRequest,
    responses(
        (status = 201, description = "Permission created", body = PermissionDto),
        (status = 400, description = "Invalid request or duplicate name", body = ErrorResponse)
    )
)]
pub async fn create_permission(
    State(state): State<AppState>,
    body: Result<Json<CreatePermissionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PermissionDto>), ApiError> {
    let command = json_body(body)?.into_command()?;
    let permission = state
        .permission_commands
        .handle_create_permission(command)
        .await?;
    Ok((StatusCode::CREATED, Json(permission)))
}

#[utoipa::path(
    get,
    path = "/permissions/{permissionId}",
    tag = "permissions",
    params(("permissionId" = String, Path, description = "Permission id (UUID)")),
    responses(
        (status = 200, description = "Permission found", body = PermissionDto),
        (status = 400, description = "Invalid or unknown permission id", body = ErrorResponse)
    )
)]
pub async fn get_permission(
    State(state): State<AppState>,
    Path(permission_id): Path<String>,
) -> Result<Json<PermissionDto>, ApiError> {
    let permission_id = parse_param("permissionId", &permission_id, PermissionId::parse)?;
    let permission = state
        .permission_queries
        .handle_get_permission(GetPermissionQuery { permission_id })
        .await?;
    Ok(Json(permission))
}

#[utoipa::path(
    get,
    path = "/permissions",
    tag = "permissions",
    responses((status = 200, description = "All permissions ordered by name", body = [PermissionDto]))
)]
pub async fn list_permissions(
    State(state): State<AppState>,
) -> Result<Json<Vec<PermissionDto>>, ApiError> {
    let permissions = state.permission_queries.handle_list_permissions().await?;
    Ok(Json(permissions))
}

#[utoipa::path(
    get,
    path = "/permissions/search",
    tag = "permissions",
    params(NameSearchParams),
    responses(
        (status = 200, description = "Permission found", body = PermissionDto),
        (status = 400, description = "Missing name or unknown permission", body = ErrorResponse)
    )
)]
pub async fn find_permission_by_name(
    State(state): State<AppState>,
    Query(params): Query<NameSearchParams>,
) -> Result<Json<PermissionDto>, ApiError> {
    let name = required_param("name", params.name.as_deref())?;
    let permission = state
        .permission_queries
        .handle_find_by_name(FindPermissionByNameQuery {
            name: name.to_string(),
        })
        .await?;
    Ok(Json(permission))
}

#[utoipa::path(
    delete,
    path = "/permissions/{permissionId}",
    tag = "permissions",
    params(("permissionId" = String, Path, description = "Permission id (UUID)")),
    responses(
        (status = 204, description = "Permission deleted"),
        (status = 400, description = "Invalid or unknown permission id", body = ErrorResponse)
    )
)]
pub async fn delete_permission(
    State(state): State<AppState>,
    Path(permission_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let permission_id = parse_param("permissionId", &permission_id, PermissionId::parse)?;
    state
        .permission_commands
        .handle_delete_permission(DeletePermissionCommand { permission_id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
