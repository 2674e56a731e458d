use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    audit::entities::NewActionLog,
    users::requests::UpdateUserRequest,
};
use crate::services::{bad_request, client_ip, current_user, not_found, read_error, storage_error};

pub async fn toggle_status(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let admin = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if admin.id == user_id {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "Cannot change the status of the current user",
        ));
    }

    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => return Ok(read_error(&e)),
    };

    let new_status = user.status.toggled();
    let update = UpdateUserRequest {
        status: Some(new_status),
        ..Default::default()
    };

    match storage.update_user(user_id, update).await {
        Ok(Some(updated)) => {
            service.evict_sessions(request, user_id).await;

            let log = NewActionLog::new(admin.id, "user.toggle_status")
                .entity("user", user_id)
                .details(format!("{} -> {}", user.status, new_status))
                .ip(client_ip(request));
            if let Err(e) = storage.record_action(log).await {
                tracing::warn!("Failed to record action log: {}", e);
            }

            tracing::info!("User {} status changed to {}", updated.username, new_status);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                updated,
                "User status updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::UserUpdateFailed)),
    }
}
