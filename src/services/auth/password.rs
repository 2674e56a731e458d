//! 找回密码
//!
//! 令牌只落库不投递；开发环境直接在响应里返回，方便联调。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::auth::requests::{ForgotPasswordRequest, ResetPasswordRequest};
use crate::models::auth::responses::ForgotPasswordResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, read_error, storage_error};
use crate::utils::password::hash_password;
use crate::utils::validate::validate_password_simple;

use super::AuthService;

/// 重置令牌有效期（小时）
const RESET_TOKEN_HOURS: i64 = 24;

const FORGOT_PASSWORD_MESSAGE: &str =
    "If the e-mail address exists, password reset instructions have been sent";

pub async fn handle_forgot_password(
    service: &AuthService,
    forgot_request: ForgotPasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let email = forgot_request.email.trim();

    let mut reset_token = None;

    match storage.get_user_by_email(email).await {
        Ok(Some(user)) => {
            let token = uuid::Uuid::new_v4().to_string();
            let expires_at =
                (chrono::Utc::now() + chrono::Duration::hours(RESET_TOKEN_HOURS)).timestamp();
            match storage.create_password_reset(user.id, &token, expires_at).await {
                Ok(_) => {
                    tracing::info!("Password reset requested for user {}", user.id);
                    reset_token = Some(token);
                }
                Err(e) => tracing::error!("Failed to store password reset token: {}", e),
            }
        }
        Ok(None) => {}
        Err(e) => tracing::error!("Forgot password lookup failed: {}", e),
    }

    // 无论邮箱是否存在都返回同样的结果
    let response = ForgotPasswordResponse {
        reset_token: reset_token.filter(|_| service.get_config().is_development()),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, FORGOT_PASSWORD_MESSAGE)))
}

pub async fn handle_reset_password(
    service: &AuthService,
    reset_request: ResetPasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let reset = match storage.get_password_reset(reset_request.token.trim()).await {
        Ok(Some(reset)) if reset.is_usable(chrono::Utc::now()) => reset,
        Ok(_) => {
            return Ok(bad_request(
                ErrorCode::ResetTokenInvalid,
                "Reset token is invalid or expired",
            ));
        }
        Err(e) => return Ok(read_error(&e)),
    };

    if let Err(msg) = validate_password_simple(&reset_request.new_password) {
        return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
    }

    let password_hash = match hash_password(&reset_request.new_password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Password reset failed",
                )),
            );
        }
    };

    match storage
        .consume_password_reset(reset.id, reset.user_id, &password_hash)
        .await
    {
        Ok(true) => {
            tracing::info!("Password reset completed for user {}", reset.user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Password reset successfully",
            )))
        }
        // 并发请求已经用掉了这个令牌
        Ok(false) => Ok(bad_request(
            ErrorCode::ResetTokenInvalid,
            "Reset token is invalid or expired",
        )),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}
