use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TeachingService, compute, ensure_assigned, ensure_teaches_class};
use crate::models::audit::entities::NewActionLog;
use crate::models::communication::entities::{NewNotification, NotificationKind};
use crate::models::grades::entities::Grade;
use crate::models::grades::requests::{
    CreateGradeRequest, GradeListParams, GradeQuery, UpdateGradeRequest,
};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode, ItemsResponse};
use crate::services::{
    bad_request, client_ip, current_user, forbidden, not_found, notify, read_error, storage_error,
};
use crate::storage::Storage;
use crate::utils::validate::{parse_date, validate_coefficient, validate_grade_value};

async fn find_grade(storage: &dyn Storage, grade_id: i64) -> Result<Grade, HttpResponse> {
    match storage.get_grade(grade_id).await {
        Ok(Some(grade)) => Ok(grade),
        Ok(None) => Err(not_found(ErrorCode::GradeNotFound, "Grade not found")),
        Err(e) => Err(read_error(&e)),
    }
}

/// 只有录入教师或管理员可以修改
fn ensure_author(user: &User, grade: &Grade) -> Result<(), HttpResponse> {
    if user.is_admin() || grade.teacher_id == user.id {
        Ok(())
    } else {
        Err(forbidden(
            ErrorCode::Forbidden,
            "Only the author of the grade can modify it",
        ))
    }
}

pub async fn create_grade(
    service: &TeachingService,
    request: &HttpRequest,
    mut req: CreateGradeRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(msg) = validate_grade_value(req.value) {
        return Ok(bad_request(ErrorCode::GradeValueInvalid, msg));
    }
    if let Some(Err(msg)) = req.coefficient.map(validate_coefficient) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    req.grade_type = req.grade_type.trim().to_string();
    if req.grade_type.is_empty() {
        return Ok(bad_request(ErrorCode::BadRequest, "grade_type is required"));
    }

    let graded_on = match req.graded_on.as_deref() {
        Some(raw) => match parse_date(raw) {
            Ok(date) => date,
            Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
        },
        None => chrono::Local::now().date_naive(),
    };

    if let Err(resp) = ensure_assigned(storage.as_ref(), &user, req.class_id, req.subject_id).await
    {
        return Ok(resp);
    }

    match storage.get_student_by_id(req.student_id).await {
        Ok(Some(student)) if student.class_id == Some(req.class_id) => {}
        Ok(Some(_)) => {
            return Ok(bad_request(
                ErrorCode::StudentNotInClass,
                "Student does not belong to this class",
            ));
        }
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(read_error(&e)),
    }

    match storage.create_grade(user.id, req, graded_on).await {
        Ok(grade) => {
            tracing::info!(
                "Grade {} recorded for student {} by {}",
                grade.id,
                grade.student_id,
                user.username
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                grade,
                "Grade created successfully",
            )))
        }
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

pub async fn update_grade(
    service: &TeachingService,
    request: &HttpRequest,
    grade_id: i64,
    req: UpdateGradeRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let grade = match find_grade(storage.as_ref(), grade_id).await {
        Ok(grade) => grade,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_author(&user, &grade) {
        return Ok(resp);
    }
    if grade.is_validated {
        return Ok(bad_request(
            ErrorCode::GradeAlreadyValidated,
            "A validated grade can no longer be modified",
        ));
    }
    if let Err(msg) = validate_grade_value(req.value) {
        return Ok(bad_request(ErrorCode::GradeValueInvalid, msg));
    }

    let reason = req
        .reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    match storage
        .update_grade_value(grade_id, req.value, user.id, reason)
        .await
    {
        Ok(Some(updated)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            updated,
            "Grade updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::GradeNotFound, "Grade not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

/// 验证成绩，然后重算平均分和班级排名并通知学生
pub async fn validate_grade(
    service: &TeachingService,
    request: &HttpRequest,
    grade_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let grade = match find_grade(storage.as_ref(), grade_id).await {
        Ok(grade) => grade,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_author(&user, &grade) {
        return Ok(resp);
    }
    if grade.is_validated {
        return Ok(bad_request(
            ErrorCode::GradeAlreadyValidated,
            "Grade is already validated",
        ));
    }

    let validated = match storage.validate_grade(grade_id).await {
        Ok(Some(grade)) => grade,
        Ok(None) => return Ok(not_found(ErrorCode::GradeNotFound, "Grade not found")),
        Err(e) => return Ok(storage_error(&e, ErrorCode::GradeAlreadyValidated)),
    };

    if let Err(e) = compute::recompute_subject_average(storage.as_ref(), &validated).await {
        tracing::error!("Failed to recompute average for grade {}: {}", grade_id, e);
        return Ok(storage_error(&e, ErrorCode::Conflict));
    }
    if let Err(e) = compute::recompute_class_ranking(storage.as_ref(), validated.class_id).await {
        tracing::error!(
            "Failed to recompute ranking for class {}: {}",
            validated.class_id,
            e
        );
        return Ok(storage_error(&e, ErrorCode::Conflict));
    }

    let log = NewActionLog::new(user.id, "grade.validate")
        .entity("grade", grade_id)
        .ip(client_ip(request));
    if let Err(e) = storage.record_action(log).await {
        tracing::warn!("Failed to record action log: {}", e);
    }

    if let Ok(Some(student)) = storage.get_student_by_id(validated.student_id).await {
        notify(
            storage.as_ref(),
            NewNotification {
                user_id: student.user_id,
                kind: NotificationKind::GradeValidated,
                title: "New grade available".to_string(),
                message: format!(
                    "A {} grade of {:.2}/20 has been validated",
                    validated.grade_type, validated.value
                ),
                link: Some("/student/grades".to_string()),
            },
        )
        .await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        validated,
        "Grade validated successfully",
    )))
}

pub async fn grade_history(
    service: &TeachingService,
    request: &HttpRequest,
    grade_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let grade = match find_grade(storage.as_ref(), grade_id).await {
        Ok(grade) => grade,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) =
        ensure_assigned(storage.as_ref(), &user, grade.class_id, grade.subject_id).await
    {
        return Ok(resp);
    }

    match storage.list_grade_history(grade_id).await {
        Ok(history) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(history),
            "Grade history retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

/// 教师查看自己班上某个学生的成绩
pub async fn student_grades(
    service: &TeachingService,
    request: &HttpRequest,
    student_id: i64,
    params: GradeListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let student = match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(read_error(&e)),
    };

    let Some(class_id) = student.class_id else {
        return Ok(bad_request(
            ErrorCode::StudentNotInClass,
            "Student is not assigned to a class",
        ));
    };
    if let Err(resp) = ensure_teaches_class(storage.as_ref(), &user, class_id).await {
        return Ok(resp);
    }

    let (page, size) = params.pagination.normalized();
    let query = GradeQuery {
        student_id: Some(student_id),
        class_id: None,
        subject_id: params.subject_id,
        validated_only: params.validated_only.unwrap_or(false),
        page,
        size,
    };

    match storage.list_grades(query).await {
        Ok(grades) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            grades,
            "Grades retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserRole, UserStatus};

    fn user(id: i64, role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@campus.local"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            first_name: "Test".into(),
            last_name: "User".into(),
            phone: None,
            address: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn grade(teacher_id: i64) -> Grade {
        let now = chrono::Utc::now();
        Grade {
            id: 1,
            student_id: 5,
            subject_id: 2,
            class_id: 3,
            grade_type: "exam".into(),
            value: 14.0,
            coefficient: 1.0,
            graded_on: now.date_naive(),
            teacher_id,
            comment: None,
            is_validated: false,
            validated_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_only_author_or_admin_may_modify() {
        assert!(ensure_author(&user(7, UserRole::Teacher), &grade(7)).is_ok());
        assert!(ensure_author(&user(1, UserRole::Admin), &grade(7)).is_ok());
        let resp = ensure_author(&user(8, UserRole::Teacher), &grade(7)).unwrap_err();
        assert_eq!(resp.status(), actix_web::http::StatusCode::FORBIDDEN);
    }
}
