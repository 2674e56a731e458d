use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::{self, ObjectCache};
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

/// 处理用户登出
///
/// 清除 refresh_token cookie；请求带有效 access token 时同时清除该用户的缓存会话。
pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user_id = RequireJWT::extract_bearer_token(request)
        .and_then(|token| JwtUtils::verify_access_token(&token).ok())
        .and_then(|claims| JwtUtils::user_id_of(&claims));

    if let (Some(user_id), Some(cache)) = (
        user_id,
        request.app_data::<web::Data<Arc<dyn ObjectCache>>>(),
    ) {
        cache::evict_user_sessions(cache.get_ref().as_ref(), user_id).await;
        tracing::info!("User {} logged out", user_id);
    }

    // max_age=0 会让浏览器删除该 cookie
    let empty_cookie = JwtUtils::create_empty_refresh_token_cookie();

    Ok(HttpResponse::Ok()
        .cookie(empty_cookie)
        .json(ApiResponse::<()>::success_empty("Logout successful")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_logout_without_token_still_clears_cookie() {
        let req = TestRequest::post().to_http_request();
        let resp = handle_logout(&req).await.unwrap();
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
        assert!(resp.cookies().any(|c| c.name() == "refresh_token"));
    }
}
