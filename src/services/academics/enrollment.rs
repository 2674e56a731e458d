use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AcademicService;
use crate::models::audit::entities::NewActionLog;
use crate::models::users::entities::ParentProfile;
use crate::models::users::requests::{AssignClassRequest, LinkChildRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{client_ip, current_user, not_found, read_error, storage_error};
use crate::storage::Storage;

async fn find_parent(storage: &dyn Storage, parent_user_id: i64) -> Result<ParentProfile, HttpResponse> {
    match storage.get_parent_by_user_id(parent_user_id).await {
        Ok(Some(parent)) => Ok(parent),
        Ok(None) => Err(not_found(ErrorCode::ParentNotFound, "Parent not found")),
        Err(e) => Err(read_error(&e)),
    }
}

/// 分班，目标班级满员时拒绝
pub async fn assign_student_class(
    service: &AcademicService,
    request: &HttpRequest,
    student_id: i64,
    req: AssignClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let admin = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let student = match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(read_error(&e)),
    };

    let class = match storage.get_class(req.class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => return Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => return Ok(read_error(&e)),
    };

    match storage.get_academic_year(req.academic_year_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::AcademicYearNotFound,
                "Academic year not found",
            ));
        }
        Err(e) => return Ok(read_error(&e)),
    }

    // 已在该班的学生不占新名额
    if student.class_id != Some(class.class.id) && class.is_full() {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::ClassFull,
            format!(
                "Class {} is full ({}/{})",
                class.class.code, class.headcount, class.class.capacity
            ),
        )));
    }

    match storage
        .assign_student_class(student_id, req.class_id, req.academic_year_id)
        .await
    {
        Ok(Some(profile)) => {
            let log = NewActionLog::new(admin.id, "student.assign_class")
                .entity("student", student_id)
                .details(format!("class {}", req.class_id))
                .ip(client_ip(request));
            if let Err(e) = storage.record_action(log).await {
                tracing::warn!("Failed to record action log: {}", e);
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                profile,
                "Student assigned to class successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

pub async fn link_child(
    service: &AcademicService,
    request: &HttpRequest,
    parent_user_id: i64,
    req: LinkChildRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let parent = match find_parent(storage.as_ref(), parent_user_id).await {
        Ok(parent) => parent,
        Err(resp) => return Ok(resp),
    };

    match storage.get_student_by_id(req.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(read_error(&e)),
    }

    match storage.link_parent_student(parent.id, req.student_id).await {
        Ok(true) => Ok(HttpResponse::Created().json(ApiResponse::success_empty(
            "Parent linked to student successfully",
        ))),
        Ok(false) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            "Parent is already linked to this student",
        ))),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

pub async fn unlink_child(
    service: &AcademicService,
    request: &HttpRequest,
    parent_user_id: i64,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let parent = match find_parent(storage.as_ref(), parent_user_id).await {
        Ok(parent) => parent,
        Err(resp) => return Ok(resp),
    };

    match storage.unlink_parent_student(parent.id, student_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Parent unlinked from student successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::NotFound, "Parent-student link not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}
