//! 用户管理接口

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::application::dto::UserDto;
use crate::application::queries::{GetUserQuery, ListUsersQuery};
use crate::domain::value_object::{Provider, UserId};
use crate::interface::http::error::{ApiError, ErrorResponse};
use crate::interface::http::extract::{json_body, parse_param};
use crate::interface::http::requests::{AssignRoleRequest, RegisterUserRequest};
use crate::interface::http::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UserSearchParams {
    /// 身份提供方，例如 `GOOGLE`
    pub provider: Option<String>,
    pub external_id: Option<String>,
}

/// 注册用户，同一 provider + externalId 再次注册时更新名称与邮箱
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered or updated", body = UserDto),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    body: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let command = json_body(body)?.into_command()?;
    let user = state.user_commands.handle_register_user(command).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/users/{userId}",
    tag = "users",
    params(("userId" = String, Path, description = "User id (UUID)")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 400, description = "Invalid user id", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserDto>, ApiError> {
    let user_id = parse_param("userId", &user_id, UserId::parse)?;
    let user = state
        .user_queries
        .handle_get_user(GetUserQuery { user_id })
        .await?;
    Ok(Json(user))
}

/// 按条件查询用户，未提供条件时返回全部用户
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(UserSearchParams),
    responses(
        (status = 200, description = "Matching users", body = [UserDto]),
        (status = 400, description = "Invalid parameter", body = ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<UserSearchParams>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let provider = match solveza_core::non_blank(params.provider.as_deref()) {
        Some(raw) => Some(parse_param("provider", raw, |raw: &str| Provider::new(raw))?),
        None => None,
    };
    let external_id = solveza_core::non_blank(params.external_id.as_deref()).map(str::to_string);

    let users = state
        .user_queries
        .handle_list_users(ListUsersQuery {
            provider,
            external_id,
        })
        .await?;
    Ok(Json(users))
}

#[utoipa::path(
    post,
    path = "/users/{userId}/roles",
    tag = "users",
    params(("userId" = String, Path, description = "User id (UUID)")),
    request_body = AssignRoleRequest,
    responses(
        (status = 200, description = "Role assigned"),
        (status = 400, description = "Invalid request or unknown role", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn assign_role(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Result<Json<AssignRoleRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let user_id = parse_param("userId", &user_id, UserId::parse)?;
    let command = json_body(body)?.into_command(user_id)?;
    state.user_commands.handle_assign_role(command).await?;
    Ok(StatusCode::OK)
}
