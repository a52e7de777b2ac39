//! HTTP 错误响应
//!
//! 所有错误统一返回 `{"code": ..., "message": ...}`，校验错误额外携带 `fieldErrors`

use std::collections::BTreeMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use solveza_core::ErrorCode;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::domain::errors::DomainError;

/// 错误响应体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<BTreeMap<String, String>>,
}

/// HTTP 层错误
#[derive(Debug)]
pub enum ApiError {
    /// 领域层返回的错误
    Domain(DomainError),
    /// 请求体字段校验失败（字段名 -> 错误信息）
    Validation(BTreeMap<String, String>),
    /// 路径或查询参数无法解析
    InvalidParameter { name: String, value: String },
    /// 缺少必需的查询参数
    MissingParameter(String),
    /// 请求体无法解析为 JSON
    MalformedBody(String),
}

impl ApiError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::Domain(err) => err.code(),
            ApiError::Validation(_) => ErrorCode::ValidationError,
            ApiError::InvalidParameter { .. } | ApiError::MissingParameter(_) => {
                ErrorCode::InvalidParameter
            }
            ApiError::MalformedBody(_) => ErrorCode::MalformedRequest,
        }
    }

    fn to_body(&self) -> ErrorResponse {
        let code = self.code();
        let (message, field_errors) = match self {
            ApiError::Domain(DomainError::Infrastructure(_)) => {
                ("An unexpected error occurred".to_string(), None)
            }
            ApiError::Domain(err) => (err.to_string(), None),
            ApiError::Validation(fields) => {
                ("Input validation failed".to_string(), Some(fields.clone()))
            }
            ApiError::InvalidParameter { name, value } => {
                (format!("Parameter '{name}' value '{value}' is invalid"), None)
            }
            ApiError::MissingParameter(name) => {
                (format!("Required parameter '{name}' is missing"), None)
            }
            ApiError::MalformedBody(detail) => {
                (format!("Malformed request body: {detail}"), None)
            }
        };

        ErrorResponse {
            code: code.as_str().to_string(),
            message,
            field_errors,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

/// Tell axum how to convert `ApiError` into a response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();
        let status =
            StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match &self {
            ApiError::Domain(DomainError::Infrastructure(err)) => {
                error!(error = ?err, "Unexpected error while handling request");
            }
            other => {
                warn!(code = %code, error = ?other, "Request rejected");
            }
        }

        (status, Json(self.to_body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_domain_errors_map_to_status() {
        assert_eq!(
            status_of(DomainError::AccountNotFound("a".into()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(DomainError::UserNotFound("u".into()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(DomainError::InsufficientPermission("p".into()).into()),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(DomainError::DuplicateAccount("d".into()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::invalid_transaction("t").into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::invalid_argument("i").into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::Infrastructure(anyhow::anyhow!("db down")).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let body = ApiError::from(DomainError::Infrastructure(anyhow::anyhow!(
            "password authentication failed"
        )))
        .to_body();
        assert_eq!(body.code, "INTERNAL_SERVER_ERROR");
        assert!(!body.message.contains("password"));
    }

    #[test]
    fn test_validation_body_lists_fields() {
        let body = ApiError::Validation(BTreeMap::from([(
            "name".to_string(),
            "must not be blank".to_string(),
        )]))
        .to_body();
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert_eq!(
            body.field_errors.unwrap().get("name").map(String::as_str),
            Some("must not be blank")
        );
    }

    #[test]
    fn test_invalid_parameter_message() {
        let body = ApiError::InvalidParameter {
            name: "userId".to_string(),
            value: "abc".to_string(),
        }
        .to_body();
        assert_eq!(body.code, "INVALID_PARAMETER");
        assert_eq!(body.message, "Parameter 'userId' value 'abc' is invalid");
    }
}
