//! 角色管理接口

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::application::commands::DeleteRoleCommand;
use crate::application::dto::RoleDto;
use crate::application::queries::{FindRoleByNameQuery, GetRoleQuery};
use crate::domain::value_object::RoleId;
use crate::interface::http::error::{ApiError, ErrorResponse};
use crate::interface::http::extract::{json_body, parse_param, required_param};
use crate::interface::http::requests::{CreateRoleRequest, DefinePermissionsRequest};
use crate::interface::http::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NameSearchParams {
    /// 精确匹配的名称
    pub name: Option<String>,
}

#[utoipa::path(
    post,
    path = "/roles",
    tag = "roles",
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Role created", body = RoleDto),
        (status = 400, description = "Invalid request or duplicate name", body = ErrorResponse)
    )
)]
pub async fn create_role(
    State(state): State<AppState>,
    body: Result<Json<CreateRoleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RoleDto>), ApiError> {
    let command = json_body(body)?.into_command()?;
    let role = state.role_commands.handle_create_role(command).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

#[utoipa::path(
    get,
    path = "/roles/{roleId}",
    tag = "roles",
    params(("roleId" = String, Path, description = "Role id (UUID)")),
    responses(
        (status = 200, description = "Role found", body = RoleDto),
        (status = 400, description = "Invalid or unknown role id", body = ErrorResponse)
    )
)]
pub async fn get_role(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> Result<Json<RoleDto>, ApiError> {
    let role_id = parse_param("roleId", &role_id, RoleId::parse)?;
    let role = state
        .role_queries
        .handle_get_role(GetRoleQuery { role_id })
        .await?;
    Ok(Json(role))
}

#[utoipa::path(
    get,
    path = "/roles",
    tag = "roles",
    responses((status = 200, description = "All roles ordered by name", body = [RoleDto]))
)]
pub async fn list_roles(State(state): State<AppState>) -> Result<Json<Vec<RoleDto>>, ApiError> {
    let roles = state.role_queries.handle_list_roles().await?;
    Ok(Json(roles))
}

#[utoipa::path(
    get,
    path = "/roles/search",
    tag = "roles",
    params(NameSearchParams),
    responses(
        (status = 200, description = "Role found", body = RoleDto),
        (status = 400, description = "Missing name or unknown role", body = ErrorResponse)
    )
)]
pub async fn find_role_by_name(
    State(state): State<AppState>,
    Query(params): Query<NameSearchParams>,
) -> Result<Json<RoleDto>, ApiError> {
    let name = required_param("name", params.name.as_deref())?;
    let role = state
        .role_queries
        .handle_find_by_name(FindRoleByNameQuery {
            name: name.to_string(),
        })
        .await?;
    Ok(Json(role))
}

/// 整体替换角色的权限集合
#[utoipa::path(
    put,
    path = "/roles/{roleId}/permissions",
    tag = "roles",
    params(("roleId" = String, Path, description = "Role id (UUID)")),
    request_body = DefinePermissionsRequest,
    responses(
        (status = 200, description = "Permissions replaced"),
        (status = 400, description = "Invalid request, unknown role or permission", body = ErrorResponse)
    )
)]
pub async fn define_permissions(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
    body: Result<Json<DefinePermissionsRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let role_id = parse_param("roleId", &role_id, RoleId::parse)?;
    let command = json_body(body)?.into_command(role_id)?;
    state.role_commands.handle_define_permissions(command).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    delete,
    path = "/roles/{roleId}",
    tag = "roles",
    params(("roleId" = String, Path, description = "Role id (UUID)")),
    responses(
        (status = 204, description = "Role deleted"),
        (status = 400, description = "Invalid or unknown role id", body = ErrorResponse)
    )
)]
pub async fn delete_role(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let role_id = parse_param("roleId", &role_id, RoleId::parse)?;
    state
        .role_commands
        .handle_delete_role(DeleteRoleCommand { role_id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
