//! HTTP 请求体及其字段校验
//!
//! 所有字段都声明为 `Option`，缺失字段与空白字段一样在转换为命令时报告，
//! 而不是在 JSON 反序列化阶段失败

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::ApiError;
use crate::application::commands::{
    AssignRoleCommand, CreateAccountCommand, CreatePermissionCommand, CreateRoleCommand,
    DefineRolePermissionsCommand, RecordDepositCommand, RecordPaymentCommand, RegisterUserCommand,
};
use crate::domain::value_object::{
    AccountId, Currency, Money, PermissionId, Provider, RoleId, UserId,
};

const MUST_NOT_BE_BLANK: &str = "must not be blank";
const MUST_NOT_BE_NULL: &str = "must not be null";
const AMOUNT_OUT_OF_BOUNDS: &str = "numeric value out of bounds (<17 digits>.<2 digits> expected)";

/// 金额列为 NUMERIC(19,2)：整数部分最多 17 位，小数部分最多 2 位
const AMOUNT_INTEGER_LIMIT: i64 = 100_000_000_000_000_000;
const AMOUNT_MAX_SCALE: u32 = 2;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$")
        .expect("email pattern must compile")
});

/// 字段错误收集器，同一字段只保留第一条错误
#[derive(Default)]
struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// 非空白时返回去除首尾空白后的值
    fn require_text<'a>(&mut self, field: &str, value: Option<&'a str>) -> Option<&'a str> {
        match value.map(str::trim) {
            Some(text) if !text.is_empty() => Some(text),
            _ => {
                self.add(field, MUST_NOT_BE_BLANK);
                None
            }
        }
    }

    fn require<T: Copy>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.add(field, MUST_NOT_BE_NULL);
        }
        value
    }

    fn finish(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.0))
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[schema(example = "GOOGLE")]
    pub provider: Option<String>,
    pub external_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl RegisterUserRequest {
    pub fn into_command(self) -> Result<RegisterUserCommand, ApiError> {
        let mut errors = FieldErrors::default();
        let provider = errors.require_text("provider", self.provider.as_deref());
        let external_id = errors.require_text("externalId", self.external_id.as_deref());
        let name = errors.require_text("name", self.name.as_deref());

        // 空字符串视为未提供
        let email = self
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty());
        if email.is_some_and(|email| !EMAIL_PATTERN.is_match(email)) {
            errors.add("email", "must be a well-formed email address");
        }
        errors.finish()?;

        match (provider, external_id, name) {
            (Some(provider), Some(external_id), Some(name)) => Ok(RegisterUserCommand {
                provider: Provider::new(provider)?,
                external_id: external_id.to_string(),
                name: name.to_string(),
                email: email.map(str::to_string),
            }),
            _ => Err(ApiError::Validation(BTreeMap::new())),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
    pub role_id: Option<Uuid>,
}

impl AssignRoleRequest {
    pub fn into_command(self, user_id: UserId) -> Result<AssignRoleCommand, ApiError> {
        let mut errors = FieldErrors::default();
        let role_id = errors.require("roleId", self.role_id);
        errors.finish()?;

        match role_id {
            Some(role_id) => Ok(AssignRoleCommand {
                user_id,
                role_id: RoleId::from_uuid(role_id),
            }),
            None => Err(ApiError::Validation(BTreeMap::new())),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CreateRoleRequest {
    pub fn into_command(self) -> Result<CreateRoleCommand, ApiError> {
        let mut errors = FieldErrors::default();
        let name = errors
            .require_text("name", self.name.as_deref())
            .map(str::to_string);
        errors.finish()?;

        Ok(CreateRoleCommand {
            name: name.unwrap_or_default(),
            description: self.description,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DefinePermissionsRequest {
    pub permission_ids: Option<Vec<Uuid>>,
}

impl DefinePermissionsRequest {
    pub fn into_command(self, role_id: RoleId) -> Result<DefineRolePermissionsCommand, ApiError> {
        let mut errors = FieldErrors::default();
        if self.permission_ids.is_none() {
            errors.add("permissionIds", MUST_NOT_BE_NULL);
        }
        errors.finish()?;

        let permission_ids: BTreeSet<PermissionId> = self
            .permission_ids
            .unwrap_or_default()
            .into_iter()
            .map(PermissionId::from_uuid)
            .collect();
        Ok(DefineRolePermissionsCommand {
            role_id,
            permission_ids,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePermissionRequest {
    pub name: Option<String>,
    pub resource: Option<String>,
    pub action: Option<String>,
}

impl CreatePermissionRequest {
    pub fn into_command(self) -> Result<CreatePermissionCommand, ApiError> {
        let mut errors = FieldErrors::default();
        let name = errors.require_text("name", self.name.as_deref());
        let resource = errors.require_text("resource", self.resource.as_deref());
        let action = errors.require_text("action", self.action.as_deref());
        errors.finish()?;

        Ok(CreatePermissionCommand {
            name: name.unwrap_or_default().to_string(),
            resource: resource.unwrap_or_default().to_string(),
            action: action.unwrap_or_default().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub requester_id: Option<Uuid>,
    pub payer_id: Option<Uuid>,
}

impl CreateAccountRequest {
    pub fn into_command(self) -> Result<CreateAccountCommand, ApiError> {
        let mut errors = FieldErrors::default();
        let requester_id = errors.require("requesterId", self.requester_id);
        let payer_id = errors.require("payerId", self.payer_id);
        errors.finish()?;

        match (requester_id, payer_id) {
            (Some(requester_id), Some(payer_id)) => Ok(CreateAccountCommand {
                requester_id: UserId::from_uuid(requester_id),
                payer_id: UserId::from_uuid(payer_id),
            }),
            _ => Err(ApiError::Validation(BTreeMap::new())),
        }
    }
}

/// 入金与付款共用的请求体
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordTransactionRequest {
    pub account_id: Option<Uuid>,
    #[schema(value_type = Option<f64>, example = 1000)]
    pub amount: Option<Decimal>,
    #[schema(example = "JPY")]
    pub currency: Option<String>,
    pub description: Option<String>,
}

fn amount_fits_column(amount: Decimal) -> bool {
    amount.normalize().scale() <= AMOUNT_MAX_SCALE
        && amount.abs() < Decimal::new(AMOUNT_INTEGER_LIMIT, 0)
}

/// 校验通过后的交易参数
struct ValidTransaction {
    account_id: AccountId,
    amount: Money,
    description: String,
}

impl RecordTransactionRequest {
    fn validate(self) -> Result<ValidTransaction, ApiError> {
        let mut errors = FieldErrors::default();
        let account_id = errors.require("accountId", self.account_id);

        let amount = errors.require("amount", self.amount);
        if let Some(amount) = amount {
            if amount <= Decimal::ZERO {
                errors.add("amount", "must be greater than 0");
            } else if !amount_fits_column(amount) {
                errors.add("amount", AMOUNT_OUT_OF_BOUNDS);
            }
        }

        let currency = errors
            .require_text("currency", self.currency.as_deref())
            .and_then(|code| match code.parse::<Currency>() {
                Ok(currency) => Some(currency),
                Err(_) => {
                    errors.add("currency", "must be a valid ISO 4217 currency code");
                    None
                }
            });
        let description = errors
            .require_text("description", self.description.as_deref())
            .map(str::to_string);
        errors.finish()?;

        match (account_id, amount, currency, description) {
            (Some(account_id), Some(amount), Some(currency), Some(description)) => {
                Ok(ValidTransaction {
                    account_id: AccountId::from_uuid(account_id),
                    amount: Money::new(amount, currency)?,
                    description,
                })
            }
            _ => Err(ApiError::Validation(BTreeMap::new())),
        }
    }

    pub fn into_deposit_command(self) -> Result<RecordDepositCommand, ApiError> {
        let valid = self.validate()?;
        Ok(RecordDepositCommand {
            account_id: valid.account_id,
            amount: valid.amount,
            description: valid.description,
        })
    }

    pub fn into_payment_command(self) -> Result<RecordPaymentCommand, ApiError> {
        let valid = self.validate()?;
        Ok(RecordPaymentCommand {
            account_id: valid.account_id,
            amount: valid.amount,
            description: valid.description,
        })
    }
}
