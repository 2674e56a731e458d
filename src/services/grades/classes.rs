use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TeachingService, ensure_teaches_class};
use crate::models::{ApiResponse, ErrorCode, ItemsResponse};
use crate::services::{current_user, not_found, read_error};

/// 当前教师任课的班级
pub async fn list_classes(
    service: &TeachingService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match storage.list_teacher_classes(user.id).await {
        Ok(classes) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(classes),
            "Classes retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn list_subjects(
    service: &TeachingService,
    request: &HttpRequest,
    class_id: Option<i64>,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match storage.list_teacher_subjects(user.id, class_id).await {
        Ok(subjects) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(subjects),
            "Subjects retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn list_class_students(
    service: &TeachingService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match storage.get_class(class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => return Ok(read_error(&e)),
    }
    if let Err(resp) = ensure_teaches_class(storage.as_ref(), &user, class_id).await {
        return Ok(resp);
    }

    match storage.list_student_summaries(Some(class_id)).await {
        Ok(students) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(students),
            "Students retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}
