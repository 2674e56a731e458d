//! 路径参数提取器
//!
//! 在进入业务逻辑前完成路径参数的解析和校验，非法参数直接返回 400。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

pub(crate) fn bad_path_param(message: String) -> actix_web::Error {
    InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

/// 解析正整数 ID
pub(crate) fn parse_positive_id(raw: Option<&str>, name: &str) -> Result<i64, String> {
    let raw = raw.ok_or_else(|| format!("Missing path parameter: {name}"))?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(format!("Invalid {name}: {raw}")),
    }
}

/// 定义一个从路径中提取正整数 ID 的提取器
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _payload: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                futures_util::future::ready(
                    $crate::utils::extractor::parse_positive_id(req.match_info().get($param), $param)
                        .map($name)
                        .map_err($crate::utils::extractor::bad_path_param),
                )
            }
        }
    };
}

define_safe_i64_extractor!(SafeIDI64, "id");
define_safe_i64_extractor!(SafeStudentIdI64, "student_id");

/// 系统设置键，只允许 `section.name` 形式
#[derive(Debug, Clone)]
pub struct SafeSettingKey(pub String);

impl SafeSettingKey {
    fn parse(raw: Option<&str>) -> Result<String, String> {
        let raw = raw.ok_or_else(|| "Missing path parameter: key".to_string())?;
        let valid = !raw.is_empty()
            && raw.len() <= 64
            && raw.contains('.')
            && raw
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.');
        if valid {
            Ok(raw.to_string())
        } else {
            Err(format!("Invalid setting key: {raw}"))
        }
    }
}

impl FromRequest for SafeSettingKey {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            Self::parse(req.match_info().get("key"))
                .map(SafeSettingKey)
                .map_err(bad_path_param),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id(Some("42"), "id"), Ok(42));
        assert!(parse_positive_id(Some("0"), "id").is_err());
        assert!(parse_positive_id(Some("-3"), "id").is_err());
        assert!(parse_positive_id(Some("abc"), "id").is_err());
        assert!(parse_positive_id(None, "id").is_err());
    }

    #[test]
    fn test_setting_key_format() {
        assert!(SafeSettingKey::parse(Some("library.loan_days")).is_ok());
        assert!(SafeSettingKey::parse(Some("nodot")).is_err());
        assert!(SafeSettingKey::parse(Some("School.Name")).is_err());
        assert!(SafeSettingKey::parse(Some("a.b;drop")).is_err());
    }

    #[actix_web::test]
    async fn test_extract_from_match_info() {
        let req = TestRequest::default().param("id", "15").to_http_request();
        let id = SafeIDI64::extract(&req).await.map(|v| v.0).ok();
        assert_eq!(id, Some(15));

        let req = TestRequest::default().param("id", "x").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());
    }
}
