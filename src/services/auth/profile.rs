use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::audit::entities::NewActionLog;
use crate::models::auth::requests::ChangePasswordRequest;
use crate::models::auth::responses::CurrentUserResponse;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, client_ip, current_user, not_found, read_error, storage_error};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::validate_password_simple;

use super::AuthService;

pub async fn handle_me(service: &AuthService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match storage.get_role_profile(user.id, user.role).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CurrentUserResponse { user, profile },
            "User information retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn handle_change_password(
    service: &AuthService,
    change_request: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let session_user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    // 缓存中的用户不带密码哈希，重新读取
    let user = match storage.get_user_by_id(session_user.id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => return Ok(read_error(&e)),
    };

    if !verify_password(&change_request.old_password, &user.password_hash) {
        return Ok(bad_request(
            ErrorCode::OldPasswordIncorrect,
            "Old password is incorrect",
        ));
    }

    if let Err(msg) = validate_password_simple(&change_request.new_password) {
        return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
    }

    let password_hash = match hash_password(&change_request.new_password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Password change failed",
                )),
            );
        }
    };

    let update = UpdateUserRequest {
        password: Some(password_hash),
        ..Default::default()
    };

    match storage.update_user(user.id, update).await {
        Ok(Some(_)) => {
            let log = NewActionLog::new(user.id, "auth.change_password")
                .entity("user", user.id)
                .ip(client_ip(request));
            if let Err(e) = storage.record_action(log).await {
                tracing::warn!("Failed to record action log: {}", e);
            }
            tracing::info!("User {} changed password", user.username);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Password changed successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::UserUpdateFailed)),
    }
}
