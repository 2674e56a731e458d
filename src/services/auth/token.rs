use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::auth::responses::RefreshTokenResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::system::DynamicConfig;
use crate::utils::jwt::{self, JwtUtils};

use super::AuthService;

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 从 cookie 中提取 refresh token
    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::error!("Refresh token failed: {}", e);
            return Ok(invalid_refresh());
        }
    };

    // 令牌签发后账户可能已被停用或删除
    let user = match JwtUtils::user_id_of(&claims) {
        Some(user_id) => match storage.get_user_by_id(user_id).await {
            Ok(Some(user)) if user.is_active() => user,
            Ok(_) => return Ok(invalid_refresh()),
            Err(e) => {
                tracing::error!("Refresh token user lookup failed: {}", e);
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        "Token refresh failed",
                    )),
                );
            }
        },
        None => return Ok(invalid_refresh()),
    };

    let access_expiry = DynamicConfig::access_token_expiry().await;
    match JwtUtils::generate_access_token(user.id, user.role.as_str(), access_expiry) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: access_expiry * 60,
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            tracing::error!("Failed to generate access token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Token refresh failed",
                )),
            )
        }
    }
}

// 清除无效的 refresh token cookie
fn invalid_refresh() -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(jwt::JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(
            ErrorCode::RefreshTokenInvalid,
            "Login expired or invalid, please login again",
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_refresh_clears_cookie() {
        let resp = invalid_refresh();
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
        let cookie = resp
            .cookies()
            .find(|c| c.name() == "refresh_token")
            .unwrap();
        assert_eq!(cookie.value(), "");
    }
}
