use chrono::{DateTime, Utc};

use super::require_non_blank;
use crate::domain::errors::DomainResult;
use crate::domain::value_object::PermissionId;

/// 权限：允许对某资源执行某操作
#[derive(Debug, Clone, PartialEq)]
pub struct Permission {
    id: PermissionId,
    name: String,
    resource: String,
    action: String,
    created_at: DateTime<Utc>,
}

impl Permission {
    pub fn create(name: &str, resource: &str, action: &str) -> DomainResult<Self> {
        Ok(Self {
            id: PermissionId::generate(),
            name: require_non_blank(name, "permission name")?,
            resource: require_non_blank(resource, "resource")?,
            action: require_non_blank(action, "action")?,
            created_at: Utc::now(),
        })
    }

    pub fn restore(
        id: PermissionId,
        name: String,
        resource: String,
        action: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            resource,
            action,
            created_at,
        }
    }

    pub fn id(&self) -> PermissionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 资源与操作都完全匹配时允许访问
    pub fn allows_access(&self, resource: &str, action: &str) -> bool {
        self.resource == resource && self.action == action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_access_requires_exact_match() {
        let permission = Permission::create("account:read", "account", "read").unwrap();
        assert!(permission.allows_access("account", "read"));
        assert!(!permission.allows_access("account", "write"));
        assert!(!permission.allows_access("Account", "read"));
    }

    #[test]
    fn test_blank_fields_rejected() {
        assert!(Permission::create("p", "", "read").is_err());
        assert!(Permission::create("p", "account", " ").is_err());
    }
}
