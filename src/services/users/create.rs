use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode, audit::entities::NewActionLog, users::requests::CreateUserRequest,
};
use crate::services::{bad_request, client_ip, current_user, storage_error};
use crate::utils::password::hash_password;
use crate::utils::validate::{
    parse_date, validate_email, validate_password_simple, validate_required, validate_username,
};

/// 创建前的字段校验
fn check_user_input(user_data: &CreateUserRequest) -> Result<(), (ErrorCode, String)> {
    validate_username(&user_data.username)
        .map_err(|msg| (ErrorCode::UserNameInvalid, msg.to_string()))?;
    validate_email(&user_data.email)
        .map_err(|msg| (ErrorCode::UserEmailInvalid, msg.to_string()))?;
    validate_password_simple(&user_data.password)
        .map_err(|msg| (ErrorCode::UserPasswordInvalid, msg))?;
    validate_required(&user_data.first_name, "first_name")
        .and_then(|_| validate_required(&user_data.last_name, "last_name"))
        .map_err(|msg| (ErrorCode::BadRequest, msg))?;

    // 档案中的日期以字符串保存，这里先确认格式
    let dates = [
        user_data
            .student
            .as_ref()
            .and_then(|s| s.birth_date.as_deref()),
        user_data.teacher.as_ref().and_then(|t| t.hired_on.as_deref()),
    ];
    for date in dates.into_iter().flatten() {
        parse_date(date).map_err(|msg| (ErrorCode::BadRequest, msg))?;
    }
    Ok(())
}

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let admin = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    user_data.username = user_data.username.trim().to_string();
    user_data.email = user_data.email.trim().to_lowercase();

    if let Err((code, msg)) = check_user_input(&user_data) {
        return Ok(bad_request(code, msg));
    }

    user_data.password = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Password hashing failed: {e}"),
                )),
            );
        }
    };

    let storage = service.get_storage(request);

    match storage.create_user(user_data).await {
        Ok(user) => {
            let log = NewActionLog::new(admin.id, "user.create")
                .entity("user", user.id)
                .details(format!("{} ({})", user.username, user.role))
                .ip(client_ip(request));
            if let Err(e) = storage.record_action(log).await {
                tracing::warn!("Failed to record action log: {}", e);
            }
            tracing::info!("User {} created by {}", user.username, admin.username);
            Ok(HttpResponse::Created().json(ApiResponse::success(user, "User created successfully")))
        }
        Err(e) => {
            error!("User creation failed: {}", e);
            Ok(storage_error(&e, ErrorCode::UserAlreadyExists))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::models::users::requests::StudentProfileInput;

    fn request() -> CreateUserRequest {
        CreateUserRequest {
            username: "jdupont".into(),
            email: "j.dupont@campus.local".into(),
            password: "Str0ngPass".into(),
            role: UserRole::Student,
            first_name: "Jean".into(),
            last_name: "Dupont".into(),
            phone: None,
            address: None,
            student: Some(StudentProfileInput {
                birth_date: Some("2008-04-12".into()),
                ..Default::default()
            }),
            teacher: None,
            parent: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(check_user_input(&request()).is_ok());
    }

    #[test]
    fn test_invalid_fields_map_to_error_codes() {
        let mut req = request();
        req.username = "ab".into();
        assert_eq!(check_user_input(&req).unwrap_err().0, ErrorCode::UserNameInvalid);

        let mut req = request();
        req.email = "not-an-email".into();
        assert_eq!(check_user_input(&req).unwrap_err().0, ErrorCode::UserEmailInvalid);

        let mut req = request();
        req.password = "short".into();
        assert_eq!(check_user_input(&req).unwrap_err().0, ErrorCode::UserPasswordInvalid);

        let mut req = request();
        req.student = Some(StudentProfileInput {
            birth_date: Some("12/04/2008".into()),
            ..Default::default()
        });
        assert_eq!(check_user_input(&req).unwrap_err().0, ErrorCode::BadRequest);
    }
}
