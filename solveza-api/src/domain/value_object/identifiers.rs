//! 实体标识值对象
//!
//! 所有实体 ID 都是 UUID 的强类型封装，避免不同实体的 ID 相互混用

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// 生成新的随机 ID（UUID v4）
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// 从字符串解析 ID
            pub fn parse(value: &str) -> DomainResult<Self> {
                Uuid::parse_str(value.trim())
                    .map(Self)
                    .map_err(|_| DomainError::invalid_argument(format!("invalid UUID string: {value}")))
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// 用户 ID
    UserId
);
define_id!(
    /// 角色 ID
    RoleId
);
define_id!(
    /// 权限 ID
    PermissionId
);
define_id!(
    /// 账户 ID
    AccountId
);
define_id!(
    /// 交易 ID
    TransactionId
);
