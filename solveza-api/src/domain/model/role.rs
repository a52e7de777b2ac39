use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::{Timestamps, require_non_blank};
use crate::domain::errors::DomainResult;
use crate::domain::value_object::{PermissionId, RoleId};

/// 角色，持有一组权限
#[derive(Debug, Clone, PartialEq)]
pub struct Role {
    id: RoleId,
    name: String,
    description: Option<String>,
    permission_ids: BTreeSet<PermissionId>,
    timestamps: Timestamps,
}

impl Role {
    pub fn create(name: &str, description: Option<String>) -> DomainResult<Self> {
        Ok(Self {
            id: RoleId::generate(),
            name: require_non_blank(name, "role name")?,
            description,
            permission_ids: BTreeSet::new(),
            timestamps: Timestamps::now(),
        })
    }

    /// 从持久化数据重建（角色表不记录更新时间）
    pub fn restore(
        id: RoleId,
        name: String,
        description: Option<String>,
        permission_ids: BTreeSet<PermissionId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            permission_ids,
            timestamps: Timestamps::restore(created_at, created_at),
        }
    }

    pub fn id(&self) -> RoleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// 返回权限集合的副本
    pub fn permission_ids(&self) -> BTreeSet<PermissionId> {
        self.permission_ids.clone()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.timestamps.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.timestamps.updated_at
    }

    pub fn update_name(&mut self, name: &str) -> DomainResult<()> {
        self.name = require_non_blank(name, "role name")?;
        self.timestamps.touch();
        Ok(())
    }

    pub fn update_description(&mut self, description: Option<String>) {
        self.description = description;
        self.timestamps.touch();
    }

    pub fn grant_permission(&mut self, permission_id: PermissionId) {
        if self.permission_ids.insert(permission_id) {
            self.timestamps.touch();
        }
    }

    pub fn revoke_permission(&mut self, permission_id: PermissionId) {
        if self.permission_ids.remove(&permission_id) {
            self.timestamps.touch();
        }
    }

    /// 用给定集合整体替换权限
    pub fn replace_permissions(&mut self, permission_ids: BTreeSet<PermissionId>) {
        self.permission_ids = permission_ids;
        self.timestamps.touch();
    }

    pub fn has_permission(&self, permission_id: PermissionId) -> bool {
        self.permission_ids.contains(&permission_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_role() {
        let role = Role::create(" admin ", Some("administrators".into())).unwrap();
        assert_eq!(role.name(), "admin");
        assert_eq!(role.description(), Some("administrators"));
        assert!(role.permission_ids().is_empty());
        assert!(Role::create("", None).is_err());
    }

    #[test]
    fn test_update_name_and_description() {
        let mut role = Role::create("auditor", Some("read only".into())).unwrap();
        role.update_name(" reviewer ").unwrap();
        role.update_description(None);
        assert_eq!(role.name(), "reviewer");
        assert_eq!(role.description(), None);
        assert!(role.update_name("  ").is_err());
    }

    #[test]
    fn test_grant_revoke_and_replace() {
        let mut role = Role::create("editor", None).unwrap();
        let read = PermissionId::generate();
        let write = PermissionId::generate();

        role.grant_permission(read);
        role.grant_permission(write);
        assert!(role.has_permission(read));

        role.revoke_permission(read);
        assert!(!role.has_permission(read));

        role.replace_permissions(BTreeSet::from([read]));
        assert!(role.has_permission(read));
        assert!(!role.has_permission(write));
    }
}
