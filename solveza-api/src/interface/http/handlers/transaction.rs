//! 交易记录与余额接口

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::application::dto::{BalanceDto, TransactionDto};
use crate::application::queries::{GetAccountBalanceQuery, GetTransactionHistoryQuery};
use crate::domain::value_object::AccountId;
use crate::interface::http::error::{ApiError, ErrorResponse};
use crate::interface::http::extract::{json_body, parse_param, required_param};
use crate::interface::http::requests::RecordTransactionRequest;
use crate::interface::http::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AccountParams {
    pub account_id: Option<String>,
}

impl AccountParams {
    fn account_id(&self) -> Result<AccountId, ApiError> {
        let raw = required_param("accountId", self.account_id.as_deref())?;
        parse_param("accountId", raw, AccountId::parse)
    }
}

#[utoipa::path(
    post,
    path = "/transactions/deposits",
    tag = "transactions",
    request_body = RecordTransactionRequest,
    responses(
        (status = 201, description = "Deposit recorded", body = TransactionDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
pub async fn record_deposit(
    State(state): State<AppState>,
    body: Result<Json<RecordTransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TransactionDto>), ApiError> {
    let command = json_body(body)?.into_deposit_command()?;
    let transaction = state
        .transaction_commands
        .handle_record_deposit(command)
        .await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

#[utoipa::path(
    post,
    path = "/transactions/payments",
    tag = "transactions",
    request_body = RecordTransactionRequest,
    responses(
        (status = 201, description = "Payment recorded", body = TransactionDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
pub async fn record_payment(
    State(state): State<AppState>,
    body: Result<Json<RecordTransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TransactionDto>), ApiError> {
    let command = json_body(body)?.into_payment_command()?;
    let transaction = state
        .transaction_commands
        .handle_record_payment(command)
        .await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// 按执行时间升序返回账户的交易记录
#[utoipa::path(
    get,
    path = "/transactions/history",
    tag = "transactions",
    params(AccountParams),
    responses(
        (status = 200, description = "Transaction history", body = [TransactionDto]),
        (status = 400, description = "Missing or invalid accountId", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
pub async fn transaction_history(
    State(state): State<AppState>,
    Query(params): Query<AccountParams>,
) -> Result<Json<Vec<TransactionDto>>, ApiError> {
    let account_id = params.account_id()?;
    let history = state
        .transaction_queries
        .handle_get_history(GetTransactionHistoryQuery { account_id })
        .await?;
    Ok(Json(history))
}

#[utoipa::path(
    get,
    path = "/transactions/balance",
    tag = "transactions",
    params(AccountParams),
    responses(
        (status = 200, description = "Current balance", body = BalanceDto),
        (status = 400, description = "Missing or invalid accountId", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
pub async fn account_balance(
    State(state): State<AppState>,
    Query(params): Query<AccountParams>,
) -> Result<Json<BalanceDto>, ApiError> {
    let account_id = params.account_id()?;
    let balance = state
        .transaction_queries
        .handle_get_balance(GetAccountBalanceQuery { account_id })
        .await?;
    Ok(Json(balance))
}
