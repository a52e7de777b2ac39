//! 领域模型

pub mod account;
pub mod permission;
pub mod role;
pub mod transaction;
pub mod user;

pub use account::{Account, Payer, Requester};
pub use permission::Permission;
pub use role::Role;
pub use transaction::{Transaction, TransactionType};
pub use user::User;

use chrono::{DateTime, Utc};

use crate::domain::errors::{DomainError, DomainResult};

/// 实体的创建与更新时间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Timestamps {
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    pub fn restore(created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            updated_at,
        }
    }

    /// 刷新更新时间
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// 去除首尾空白后必须非空
pub(crate) fn require_non_blank(value: &str, field: &str) -> DomainResult<String> {
    solveza_core::non_blank(Some(value))
        .map(str::to_string)
        .ok_or_else(|| DomainError::invalid_argument(format!("{field} must not be blank")))
}
