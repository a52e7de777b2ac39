//! Provider 值对象
//!
//! 外部身份提供方（Google、GitHub 等）的名称

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// 身份提供方
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Provider(String);

impl Provider {
    pub const GOOGLE: &'static str = "GOOGLE";
    pub const GITHUB: &'static str = "GITHUB";
    pub const MICROSOFT: &'static str = "MICROSOFT";
    pub const AUTH0: &'static str = "AUTH0";

    /// 创建提供方，名称去除首尾空白后不能为空
    pub fn new(name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_argument(
                "provider name must not be blank",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn google() -> Self {
        Self(Self::GOOGLE.to_string())
    }

    pub fn github() -> Self {
        Self(Self::GITHUB.to_string())
    }

    pub fn microsoft() -> Self {
        Self(Self::MICROSOFT.to_string())
    }

    pub fn auth0() -> Self {
        Self(Self::AUTH0.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Provider {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_providers() {
        assert_eq!(Provider::google().as_str(), "GOOGLE");
        assert_eq!(Provider::auth0().to_string(), "AUTH0");
        assert_eq!(Provider::microsoft().as_ref(), "MICROSOFT");
    }

    #[test]
    fn test_blank_provider_rejected() {
        assert!(Provider::new("  ").is_err());
        assert_eq!(Provider::new(" GITHUB ").unwrap(), Provider::github());
    }
}
