pub mod academics;
pub mod analytics;
pub mod auth;
pub mod communication;
pub mod exports;
pub mod finance;
pub mod gamification;
pub mod grades;
pub mod library;
pub mod parents;
pub mod students;
pub mod system;
pub mod users;

pub use academics::AcademicService;
pub use analytics::AnalyticsService;
pub use auth::AuthService;
pub use communication::CommunicationService;
pub use exports::ExportService;
pub use finance::FinanceService;
pub use gamification::GamificationService;
pub use grades::TeachingService;
pub use library::LibraryService;
pub use parents::ParentPortalService;
pub use students::StudentPortalService;
pub use system::SystemService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse};

use crate::errors::CampusError;
use crate::middlewares::RequireJWT;
use crate::models::communication::entities::NewNotification;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 取当前登录用户，缺失时给出 401 响应
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        ))
    })
}

/// 存储层错误转换为 HTTP 响应
///
/// 唯一约束和外键冲突返回 409 并使用调用方给出的错误码，其余按错误类别处理。
pub(crate) fn storage_error(err: &CampusError, conflict_code: ErrorCode) -> HttpResponse {
    match err {
        CampusError::Conflict(msg) => {
            HttpResponse::Conflict().json(ApiResponse::error_empty(conflict_code, msg.as_str()))
        }
        CampusError::ClassFull(msg) => {
            HttpResponse::Conflict().json(ApiResponse::error_empty(ErrorCode::ClassFull, msg.as_str()))
        }
        CampusError::NotFound(msg) => {
            HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::NotFound, msg.as_str()))
        }
        CampusError::Validation(msg) | CampusError::DateParse(msg) => HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg.as_str())),
        other => {
            tracing::error!("{}", other);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                other.message(),
            ))
        }
    }
}

/// 读路径的存储错误，不带冲突错误码
pub(crate) fn read_error(err: &CampusError) -> HttpResponse {
    storage_error(err, ErrorCode::InternalServerError)
}

/// 400 响应
pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

/// 404 响应
pub(crate) fn not_found(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

/// 403 响应
pub(crate) fn forbidden(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(code, message))
}

/// 客户端 IP
pub(crate) fn client_ip(request: &HttpRequest) -> Option<String> {
    request
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string())
}

pub(crate) fn user_agent(request: &HttpRequest) -> Option<String> {
    request
        .headers()
        .get(actix_web::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.chars().take(255).collect())
}

/// 发送站内通知，失败只记日志
pub(crate) async fn notify(storage: &dyn Storage, notification: NewNotification) {
    let user_id = notification.user_id;
    if let Err(e) = storage.create_notification(notification).await {
        tracing::warn!("Failed to notify user {}: {}", user_id, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_storage_error_status() {
        let resp = storage_error(
            &CampusError::conflict("dup"),
            ErrorCode::CodeAlreadyExists,
        );
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = storage_error(&CampusError::not_found("x"), ErrorCode::Conflict);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = storage_error(&CampusError::validation("x"), ErrorCode::Conflict);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = storage_error(
            &CampusError::database_operation("boom"),
            ErrorCode::Conflict,
        );
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_current_user_requires_middleware() {
        let req = actix_web::test::TestRequest::default().to_http_request();
        let resp = current_user(&req).unwrap_err();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
