use chrono::{DateTime, Utc};

use super::Timestamps;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_object::{AccountId, UserId};

/// 请求方（发起支付请求的用户）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Requester(UserId);

impl Requester {
    pub fn new(user_id: UserId) -> Self {
        Self(user_id)
    }

    pub fn user_id(&self) -> UserId {
        self.0
    }
}

/// 付款方（承担支付的用户）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Payer(UserId);

impl Payer {
    pub fn new(user_id: UserId) -> Self {
        Self(user_id)
    }

    pub fn user_id(&self) -> UserId {
        self.0
    }
}

/// 账户：连接一个请求方与一个付款方
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: AccountId,
    requester: Requester,
    payer: Payer,
    timestamps: Timestamps,
}

impl Account {
    /// 创建账户，请求方与付款方必须是不同用户
    pub fn create(requester: Requester, payer: Payer) -> DomainResult<Self> {
        if requester.user_id() == payer.user_id() {
            return Err(DomainError::invalid_argument(
                "requester and payer must be different users",
            ));
        }
        Ok(Self {
            id: AccountId::generate(),
            requester,
            payer,
            timestamps: Timestamps::now(),
        })
    }

    pub fn restore(
        id: AccountId,
        requester: Requester,
        payer: Payer,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            requester,
            payer,
            timestamps: Timestamps::restore(created_at, updated_at),
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn requester(&self) -> Requester {
        self.requester
    }

    pub fn payer(&self) -> Payer {
        self.payer
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.timestamps.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.timestamps.updated_at
    }

    pub fn is_requester(&self, user_id: UserId) -> bool {
        self.requester.user_id() == user_id
    }

    pub fn is_payer(&self, user_id: UserId) -> bool {
        self.payer.user_id() == user_id
    }

    pub fn is_participant(&self, user_id: UserId) -> bool {
        self.is_requester(user_id) || self.is_payer(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_user_rejected() {
        let user = UserId::generate();
        let result = Account::create(Requester::new(user), Payer::new(user));
        assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
    }

    #[test]
    fn test_participants() {
        let requester = UserId::generate();
        let payer = UserId::generate();
        let outsider = UserId::generate();
        let account = Account::create(Requester::new(requester), Payer::new(payer)).unwrap();

        assert!(account.is_requester(requester));
        assert!(!account.is_requester(payer));
        assert!(account.is_payer(payer));
        assert!(account.is_participant(requester));
        assert!(account.is_participant(payer));
        assert!(!account.is_participant(outsider));
    }
}
