use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    audit::entities::NewLoginLog,
    auth::{LoginRequest, LoginResponse},
};
use crate::services::system::DynamicConfig;
use crate::services::{client_ip, user_agent};
use crate::storage::Storage;
use crate::utils::jwt;
use crate::utils::password::verify_password;

use super::AuthService;

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let identifier = login_request.username.trim().to_string();

    let mut attempt = NewLoginLog {
        user_id: None,
        identifier: identifier.clone(),
        success: false,
        ip_address: client_ip(request),
        user_agent: user_agent(request),
    };

    // 1. 根据用户名或邮箱获取用户信息
    let user = match storage.get_user_by_username_or_email(&identifier).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            record_attempt(storage.as_ref(), attempt).await;
            return Ok(auth_failed());
        }
        Err(e) => {
            tracing::error!("Login lookup failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Login failed: {e}"),
                )),
            );
        }
    };
    attempt.user_id = Some(user.id);

    // 2. 验证密码
    if !verify_password(&login_request.password, &user.password_hash) {
        record_attempt(storage.as_ref(), attempt).await;
        return Ok(auth_failed());
    }

    // 3. 账户状态
    if !user.is_active() {
        record_attempt(storage.as_ref(), attempt).await;
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AccountInactive,
            "Account is not active",
        )));
    }

    attempt.success = true;
    record_attempt(storage.as_ref(), attempt).await;

    // 4. 更新最后登录时间
    if let Err(e) = storage.update_last_login(user.id).await {
        tracing::warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    // 5. 生成令牌对
    let access_expiry = DynamicConfig::access_token_expiry().await;
    let refresh_lifetime = DynamicConfig::refresh_token_lifetime(login_request.remember_me).await;

    match user.generate_token_pair(access_expiry, refresh_lifetime) {
        Ok(token_pair) => {
            tracing::info!("User {} logged in successfully", user.username);

            let refresh_cookie =
                jwt::JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token, refresh_lifetime);

            let response = LoginResponse {
                access_token: token_pair.access_token,
                expires_in: access_expiry * 60, // 转换为秒
                user,
                created_at: chrono::Utc::now(),
            };

            Ok(HttpResponse::Ok()
                .cookie(refresh_cookie)
                .json(ApiResponse::success(response, "Login successful")))
        }
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            )
        }
    }
}

fn auth_failed() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Username or password is incorrect",
    ))
}

async fn record_attempt(storage: &dyn Storage, attempt: NewLoginLog) {
    if let Err(e) = storage.record_login_attempt(attempt).await {
        tracing::warn!("Failed to record login attempt: {}", e);
    }
}
