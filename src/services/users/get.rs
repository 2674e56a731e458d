use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::users::responses::UserDetailResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::read_error;

pub async fn get_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get user information: {e}"),
                )),
            );
        }
    };

    match storage.get_role_profile(user.id, user.role).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserDetailResponse { user, profile },
            "User information retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}
