//! 账户接口

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::application::commands::DeleteAccountCommand;
use crate::application::dto::AccountDto;
use crate::application::queries::{GetAccountQuery, ListAccountsByUserQuery};
use crate::domain::value_object::{AccountId, UserId};
use crate::interface::http::error::{ApiError, ErrorResponse};
use crate::interface::http::extract::{json_body, parse_param, required_param};
use crate::interface::http::requests::CreateAccountRequest;
use crate::interface::http::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AccountsByUserParams {
    /// 作为请求方或付款方参与账户的用户 ID
    pub user_id: Option<String>,
}

/// 创建请求方与付款方之间的账户
#[utoipa::path(
    post,
    path = "/accounts",
    tag = "accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountDto),
        (status = 400, description = "Invalid request or same user on both sides", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Account already exists for the pair", body = ErrorResponse)
    )
)]
pub async fn create_account(
    State(state): State<AppState>,
    body: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountDto>), ApiError> {
    let command = json_body(body)?.into_command()?;
    let account = state.account_commands.handle_create_account(command).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

#[utoipa::path(
    get,
    path = "/accounts/{accountId}",
    tag = "accounts",
    params(("accountId" = String, Path, description = "Account id (UUID)")),
    responses(
        (status = 200, description = "Account found", body = AccountDto),
        (status = 400, description = "Invalid account id", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
pub async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<AccountDto>, ApiError> {
    let account_id = parse_param("accountId", &account_id, AccountId::parse)?;
    let account = state
        .account_queries
        .handle_get_account(GetAccountQuery { account_id })
        .await?;
    Ok(Json(account))
}

#[utoipa::path(
    get,
    path = "/accounts",
    tag = "accounts",
    params(AccountsByUserParams),
    responses(
        (status = 200, description = "Accounts the user participates in", body = [AccountDto]),
        (status = 400, description = "Missing or invalid userId", body = ErrorResponse)
    )
)]
pub async fn list_accounts_by_user(
    State(state): State<AppState>,
    Query(params): Query<AccountsByUserParams>,
) -> Result<Json<Vec<AccountDto>>, ApiError> {
    let raw = required_param("userId", params.user_id.as_deref())?;
    let user_id = parse_param("userId", raw, UserId::parse)?;
    let accounts = state
        .account_queries
        .handle_list_by_user(ListAccountsByUserQuery { user_id })
        .await?;
    Ok(Json(accounts))
}

/// 删除账户及其交易记录
#[utoipa::path(
    delete,
    path = "/accounts/{accountId}",
    tag = "accounts",
    params(("accountId" = String, Path, description = "Account id (UUID)")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 400, description = "Invalid account id", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
pub async fn delete_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let account_id = parse_param("accountId", &account_id, AccountId::parse)?;
    state
        .account_commands
        .handle_delete_account(DeleteAccountCommand { account_id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
