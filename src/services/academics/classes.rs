use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AcademicService;
use crate::models::academics::requests::{ClassListParams, CreateClassRequest, UpdateClassRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, not_found, read_error, storage_error};
use crate::storage::Storage;
use crate::utils::validate::{validate_code, validate_required};

/// 确认班级引用的专业、年级、学年都存在
async fn check_references(
    storage: &dyn Storage,
    program_id: Option<i64>,
    level_id: Option<i64>,
    academic_year_id: Option<i64>,
) -> Result<(), HttpResponse> {
    if let Some(id) = program_id {
        match storage.get_program(id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(not_found(ErrorCode::ProgramNotFound, "Program not found")),
            Err(e) => return Err(read_error(&e)),
        }
    }
    if let Some(id) = level_id {
        match storage.get_level(id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(not_found(ErrorCode::LevelNotFound, "Level not found")),
            Err(e) => return Err(read_error(&e)),
        }
    }
    if let Some(id) = academic_year_id {
        match storage.get_academic_year(id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(not_found(
                    ErrorCode::AcademicYearNotFound,
                    "Academic year not found",
                ));
            }
            Err(e) => return Err(read_error(&e)),
        }
    }
    Ok(())
}

pub async fn list_classes(
    service: &AcademicService,
    request: &HttpRequest,
    params: ClassListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_classes_with_pagination(params).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Classes retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn create_class(
    service: &AcademicService,
    request: &HttpRequest,
    mut req: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    req.code = req.code.trim().to_string();
    if let Err(msg) = validate_code(&req.code) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Err(msg) = validate_required(&req.label, "label") {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if req.capacity.is_some_and(|c| c <= 0) {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "Capacity must be greater than 0",
        ));
    }

    if let Err(resp) = check_references(
        storage.as_ref(),
        Some(req.program_id),
        Some(req.level_id),
        Some(req.academic_year_id),
    )
    .await
    {
        return Ok(resp);
    }

    match storage.create_class(req).await {
        Ok(class) => {
            tracing::info!("Class {} created", class.code);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                class,
                "Class created successfully",
            )))
        }
        Err(e) => Ok(storage_error(&e, ErrorCode::CodeAlreadyExists)),
    }
}

pub async fn get_class(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_class(id).await {
        Ok(Some(class)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            class,
            "Class retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn update_class(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
    req: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let existing = match storage.get_class(id).await {
        Ok(Some(class)) => class,
        Ok(None) => return Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => return Ok(read_error(&e)),
    };

    // 容量不能低于当前人数
    if let Some(capacity) = req.capacity
        && (capacity <= 0 || (capacity as i64) < existing.headcount)
    {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            format!(
                "Capacity must be greater than 0 and at least the current headcount ({})",
                existing.headcount
            ),
        ));
    }

    if let Err(resp) = check_references(
        storage.as_ref(),
        req.program_id,
        req.level_id,
        req.academic_year_id,
    )
    .await
    {
        return Ok(resp);
    }

    match storage.update_class(id, req).await {
        Ok(Some(class)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            class,
            "Class updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

pub async fn delete_class(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_class(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Class deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::ResourceInUse)),
    }
}
