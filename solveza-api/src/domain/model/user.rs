use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::{Timestamps, require_non_blank};
use crate::domain::errors::DomainResult;
use crate::domain::value_object::{Provider, RoleId, UserId};

/// 通过外部身份提供方登录的用户
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    provider: Provider,
    external_id: String,
    name: String,
    email: Option<String>,
    role_ids: BTreeSet<RoleId>,
    timestamps: Timestamps,
}

impl User {
    /// 创建新用户
    pub fn create(
        provider: Provider,
        external_id: &str,
        name: &str,
        email: Option<String>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: UserId::generate(),
            provider,
            external_id: require_non_blank(external_id, "external id")?,
            name: require_non_blank(name, "user name")?,
            email: normalize_email(email),
            role_ids: BTreeSet::new(),
            timestamps: Timestamps::now(),
        })
    }

    /// 从持久化数据重建
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: UserId,
        provider: Provider,
        external_id: String,
        name: String,
        email: Option<String>,
        role_ids: BTreeSet<RoleId>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            provider,
            external_id,
            name,
            email,
            role_ids,
            timestamps: Timestamps::restore(created_at, updated_at),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// 返回角色集合的副本
    pub fn role_ids(&self) -> BTreeSet<RoleId> {
        self.role_ids.clone()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.timestamps.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.timestamps.updated_at
    }

    pub fn update_name(&mut self, name: &str) -> DomainResult<()> {
        self.name = require_non_blank(name, "user name")?;
        self.timestamps.touch();
        Ok(())
    }

    pub fn update_email(&mut self, email: Option<String>) {
        self.email = normalize_email(email);
        self.timestamps.touch();
    }

    pub fn assign_role(&mut self, role_id: RoleId) {
        if self.role_ids.insert(role_id) {
            self.timestamps.touch();
        }
    }

    pub fn remove_role(&mut self, role_id: RoleId) {
        if self.role_ids.remove(&role_id) {
            self.timestamps.touch();
        }
    }

    pub fn has_role(&self, role_id: RoleId) -> bool {
        self.role_ids.contains(&role_id)
    }
}

fn normalize_email(email: Option<String>) -> Option<String> {
    email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::create(Provider::google(), "g-123", "Taro", None).unwrap()
    }

    #[test]
    fn test_create_requires_name_and_external_id() {
        assert!(User::create(Provider::google(), "", "Taro", None).is_err());
        assert!(User::create(Provider::google(), "g-1", "   ", None).is_err());
    }

    #[test]
    fn test_blank_email_is_dropped() {
        let user = User::create(Provider::github(), "gh-1", "Hanako", Some(" ".into())).unwrap();
        assert_eq!(user.email(), None);
    }

    #[test]
    fn test_role_assignment() {
        let mut user = user();
        let role = RoleId::generate();
        user.assign_role(role);
        user.assign_role(role);
        assert!(user.has_role(role));
        assert_eq!(user.role_ids().len(), 1);

        user.remove_role(role);
        assert!(!user.has_role(role));
    }

    #[test]
    fn test_update_name_touches_timestamp() {
        let mut user = user();
        let before = user.updated_at();
        user.update_name("Jiro").unwrap();
        assert_eq!(user.name(), "Jiro");
        assert!(user.updated_at() >= before);
        assert!(user.update_name("").is_err());
        assert_eq!(user.name(), "Jiro");
    }
}
