//! 路径、查询参数与请求体的解析辅助

use axum::Json;
use axum::extract::rejection::JsonRejection;

use super::error::ApiError;

/// 解析单个参数，失败时返回 `INVALID_PARAMETER`
pub fn parse_param<T, E>(
    name: &str,
    raw: &str,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Result<T, ApiError> {
    parse(raw).map_err(|_| ApiError::InvalidParameter {
        name: name.to_string(),
        value: raw.to_string(),
    })
}

/// 必需的查询参数，缺失或为空时返回 `INVALID_PARAMETER`
pub fn required_param<'a>(name: &str, raw: Option<&'a str>) -> Result<&'a str, ApiError> {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::MissingParameter(name.to_string())),
    }
}

/// 将 JSON 解析失败转换为 `MALFORMED_REQUEST`
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::MalformedBody(rejection.body_text())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::UserId;

    #[test]
    fn test_parse_param_reports_name_and_value() {
        let err = parse_param("userId", "not-a-uuid", UserId::parse).unwrap_err();
        match err {
            ApiError::InvalidParameter { name, value } => {
                assert_eq!(name, "userId");
                assert_eq!(value, "not-a-uuid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_param_accepts_uuid() {
        let id = UserId::generate();
        let parsed = parse_param("userId", &id.to_string(), UserId::parse).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_required_param() {
        assert_eq!(required_param("name", Some(" admin ")).unwrap(), "admin");
        assert!(matches!(
            required_param("name", Some("  ")),
            Err(ApiError::MissingParameter(_))
        ));
        assert!(matches!(
            required_param("name", None),
            Err(ApiError::MissingParameter(_))
        ));
    }
}
