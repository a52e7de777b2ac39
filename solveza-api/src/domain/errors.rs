//! 领域错误定义

use solveza_core::ErrorCode;
use thiserror::Error;

/// 领域层错误
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Insufficient permission: {0}")]
    InsufficientPermission(String),

    #[error("{0}")]
    InvalidTransaction(String),

    #[error("{0}")]
    DuplicateAccount(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Infrastructure(#[from] anyhow::Error),
}

impl DomainError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn invalid_transaction(message: impl Into<String>) -> Self {
        Self::InvalidTransaction(message.into())
    }

    /// 对外错误码
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::AccountNotFound(_) => ErrorCode::AccountNotFound,
            DomainError::UserNotFound(_) => ErrorCode::UserNotFound,
            DomainError::InsufficientPermission(_) => ErrorCode::InsufficientPermission,
            DomainError::InvalidTransaction(_) => ErrorCode::InvalidTransaction,
            DomainError::DuplicateAccount(_) => ErrorCode::DuplicateAccount,
            DomainError::InvalidArgument(_) => ErrorCode::IllegalArgument,
            DomainError::Infrastructure(_) => ErrorCode::InternalServerError,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            DomainError::AccountNotFound("x".into()).code(),
            ErrorCode::AccountNotFound
        );
        assert_eq!(
            DomainError::invalid_argument("bad").code(),
            ErrorCode::IllegalArgument
        );
        let infra: DomainError = anyhow::anyhow!("connection reset").into();
        assert_eq!(infra.code(), ErrorCode::InternalServerError);
    }

    #[test]
    fn test_not_found_messages() {
        let err = DomainError::UserNotFound("5f0c".into());
        assert_eq!(err.to_string(), "User not found: 5f0c");
    }
}
