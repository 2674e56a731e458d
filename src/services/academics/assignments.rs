//! 任课安排与课表

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AcademicService;
use crate::models::academics::entities::sort_timetable;
use crate::models::academics::requests::{AssignSubjectRequest, CreateTimetableSlotRequest};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode, ItemsResponse};
use crate::services::{bad_request, not_found, read_error, storage_error};
use crate::storage::Storage;
use crate::utils::validate::validate_time_range;

/// 班级、科目存在且教师是教师账户
async fn check_class_subject_teacher(
    storage: &dyn Storage,
    class_id: i64,
    subject_id: i64,
    teacher_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_class(class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => return Err(read_error(&e)),
    }
    match storage.get_subject(subject_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => return Err(read_error(&e)),
    }
    match storage.get_user_by_id(teacher_id).await {
        Ok(Some(user)) if user.role == UserRole::Teacher => Ok(()),
        Ok(Some(_)) => Err(bad_request(
            ErrorCode::TeacherNotFound,
            "The selected user is not a teacher",
        )),
        Ok(None) => Err(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => Err(read_error(&e)),
    }
}

pub async fn assign_subject(
    service: &AcademicService,
    request: &HttpRequest,
    req: AssignSubjectRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(resp) =
        check_class_subject_teacher(storage.as_ref(), req.class_id, req.subject_id, req.teacher_id)
            .await
    {
        return Ok(resp);
    }

    match storage.assign_class_subject(req).await {
        Ok(assignment) => Ok(HttpResponse::Created().json(ApiResponse::success(
            assignment,
            "Subject assigned successfully",
        ))),
        // (班级, 科目) 唯一
        Err(e) => Ok(storage_error(&e, ErrorCode::ClassSubjectAlreadyAssigned)),
    }
}

pub async fn list_class_subjects(
    service: &AcademicService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_class_subjects(class_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(items),
            "Class subjects retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn remove_class_subject(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.remove_class_subject(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Subject assignment removed successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::NotFound, "Subject assignment not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::ResourceInUse)),
    }
}

pub async fn create_timetable_slot(
    service: &AcademicService,
    request: &HttpRequest,
    mut req: CreateTimetableSlotRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(msg) = validate_time_range(&req.start_time, &req.end_time) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    req.start_time = req.start_time.trim().to_string();
    req.end_time = req.end_time.trim().to_string();

    if let Err(resp) =
        check_class_subject_teacher(storage.as_ref(), req.class_id, req.subject_id, req.teacher_id)
            .await
    {
        return Ok(resp);
    }

    match storage.create_timetable_slot(req).await {
        Ok(slot) => Ok(HttpResponse::Created().json(ApiResponse::success(
            slot,
            "Timetable slot created successfully",
        ))),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

pub async fn list_class_timetable(
    service: &AcademicService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_class_timetable(class_id).await {
        Ok(mut slots) => {
            sort_timetable(&mut slots);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ItemsResponse::new(slots),
                "Timetable retrieved successfully",
            )))
        }
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn delete_timetable_slot(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_timetable_slot(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Timetable slot deleted successfully",
        ))),
        Ok(false) => Ok(not_found(
            ErrorCode::TimetableSlotNotFound,
            "Timetable slot not found",
        )),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}
