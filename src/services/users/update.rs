use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    audit::entities::NewActionLog,
    users::requests::UpdateUserRequest,
};
use crate::services::{bad_request, client_ip, current_user, read_error, storage_error};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple};

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let admin = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Some(role) = update_data.role {
        match storage.get_user_by_id(user_id).await {
            Ok(Some(existing)) if !existing.role.can_change_to(role) => {
                return Ok(bad_request(
                    ErrorCode::UserRoleChangeNotAllowed,
                    format!(
                        "Cannot change role from {} to {}: the role profile would not match",
                        existing.role, role
                    ),
                ));
            }
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::UserNotFound,
                    "User not found",
                )));
            }
            Err(e) => return Ok(read_error(&e)),
        }
    }

    if let Some(email) = update_data.email.as_mut() {
        *email = email.trim().to_lowercase();
        if let Err(msg) = validate_email(email) {
            return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
        }
    }

    if let Some(password) = update_data.password.take() {
        if let Err(msg) = validate_password_simple(&password) {
            return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
        }
        match hash_password(&password) {
            Ok(hash) => update_data.password = Some(hash),
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("Password hashing failed: {e}"),
                    )),
                );
            }
        }
    }

    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => {
            // 角色、状态或密码可能已变化
            service.evict_sessions(request, user.id).await;

            let log = NewActionLog::new(admin.id, "user.update")
                .entity("user", user.id)
                .ip(client_ip(request));
            if let Err(e) = storage.record_action(log).await {
                tracing::warn!("Failed to record action log: {}", e);
            }

            Ok(HttpResponse::Ok().json(ApiResponse::success(
                user,
                "User information updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(storage_error(&e, ErrorCode::UserAlreadyExists)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::{HttpMessage, http::StatusCode, test};
    use std::sync::Arc;

    fn role_only(role: UserRole) -> UpdateUserRequest {
        UpdateUserRequest {
            email: None,
            first_name: None,
            last_name: None,
            phone: None,
            address: None,
            role: Some(role),
            status: None,
            password: None,
        }
    }

    #[actix_web::test]
    async fn test_student_cannot_become_teacher() {
        let storage = fixtures::memory_storage().await;
        let admin = fixtures::user(&storage, "directeur", UserRole::Admin).await;
        let student = fixtures::student(&storage, "eleve", None, None).await;

        let service = UserService {
            storage: Some(Arc::new(storage)),
        };
        let request = test::TestRequest::default().to_http_request();
        request.extensions_mut().insert(admin);

        let resp = update_user(&service, student.user_id, role_only(UserRole::Teacher), &request)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let unchanged = service
            .get_storage(&request)
            .get_user_by_id(student.user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.role, UserRole::Student);
    }
}
