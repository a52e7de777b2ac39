//! Solveza Core 错误码模块
//!
//! 对外接口返回的错误码统一在此定义，服务层负责把领域错误映射到这些错误码。

use std::fmt;

/// 对外暴露的错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    AccountNotFound,
    UserNotFound,
    InsufficientPermission,
    InvalidTransaction,
    DuplicateAccount,
    ValidationError,
    IllegalArgument,
    InvalidParameter,
    MalformedRequest,
    InternalServerError,
}

impl ErrorCode {
    /// 错误码字符串（如 `ACCOUNT_NOT_FOUND`）
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AccountNotFound => "ACCOUNT_NOT_FOUND",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::InsufficientPermission => "INSUFFICIENT_PERMISSION",
            ErrorCode::InvalidTransaction => "INVALID_TRANSACTION",
            ErrorCode::DuplicateAccount => "DUPLICATE_ACCOUNT",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::IllegalArgument => "ILLEGAL_ARGUMENT",
            ErrorCode::InvalidParameter => "INVALID_PARAMETER",
            ErrorCode::MalformedRequest => "MALFORMED_REQUEST",
            ErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }

    /// 对应的 HTTP 状态码
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::AccountNotFound | ErrorCode::UserNotFound => 404,
            ErrorCode::InsufficientPermission => 403,
            ErrorCode::DuplicateAccount => 409,
            ErrorCode::InvalidTransaction
            | ErrorCode::ValidationError
            | ErrorCode::IllegalArgument
            | ErrorCode::InvalidParameter
            | ErrorCode::MalformedRequest => 400,
            ErrorCode::InternalServerError => 500,
        }
    }

    /// 是否属于服务端错误
    pub fn is_server_error(&self) -> bool {
        self.http_status() >= 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(ErrorCode::AccountNotFound.http_status(), 404);
        assert_eq!(ErrorCode::DuplicateAccount.http_status(), 409);
        assert_eq!(ErrorCode::InsufficientPermission.http_status(), 403);
        assert_eq!(ErrorCode::IllegalArgument.http_status(), 400);
        assert!(ErrorCode::InternalServerError.is_server_error());
        assert!(!ErrorCode::ValidationError.is_server_error());
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::InvalidParameter.to_string(), "INVALID_PARAMETER");
    }
}
