//! 专业、年级、科目这类基础数据

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AcademicService;
use crate::models::academics::requests::{
    CreateLevelRequest, CreateProgramRequest, CreateSubjectRequest, UpdateLevelRequest,
    UpdateProgramRequest, UpdateSubjectRequest,
};
use crate::models::{ApiResponse, ErrorCode, ItemsResponse};
use crate::services::{bad_request, not_found, read_error, storage_error};
use crate::utils::validate::{validate_code, validate_coefficient, validate_required};

fn check_code_and_label(code: &str, label: &str) -> Result<(), String> {
    validate_code(code).map_err(str::to_string)?;
    validate_required(label, "label")
}

fn deleted(result: crate::errors::Result<bool>, code: ErrorCode, what: &str) -> HttpResponse {
    match result {
        Ok(true) => HttpResponse::Ok().json(ApiResponse::success_empty(format!(
            "{what} deleted successfully"
        ))),
        Ok(false) => not_found(code, format!("{what} not found")),
        // 仍被班级等引用
        Err(e) => storage_error(&e, ErrorCode::ResourceInUse),
    }
}

// ============================================
// 专业
// ============================================

pub async fn list_programs(
    service: &AcademicService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_programs().await {
        Ok(programs) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(programs),
            "Programs retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn create_program(
    service: &AcademicService,
    request: &HttpRequest,
    mut req: CreateProgramRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    req.code = req.code.trim().to_string();
    if let Err(msg) = check_code_and_label(&req.code, &req.label) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    match storage.create_program(req).await {
        Ok(program) => Ok(HttpResponse::Created().json(ApiResponse::success(
            program,
            "Program created successfully",
        ))),
        Err(e) => Ok(storage_error(&e, ErrorCode::CodeAlreadyExists)),
    }
}

pub async fn update_program(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
    req: UpdateProgramRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(Err(msg)) = req.label.as_deref().map(|l| validate_required(l, "label")) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    match storage.update_program(id, req).await {
        Ok(Some(program)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            program,
            "Program updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ProgramNotFound, "Program not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

pub async fn delete_program(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    Ok(deleted(
        storage.delete_program(id).await,
        ErrorCode::ProgramNotFound,
        "Program",
    ))
}

// ============================================
// 年级
// ============================================

pub async fn list_levels(
    service: &AcademicService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_levels().await {
        Ok(levels) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(levels),
            "Levels retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn create_level(
    service: &AcademicService,
    request: &HttpRequest,
    mut req: CreateLevelRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    req.code = req.code.trim().to_string();
    if let Err(msg) = check_code_and_label(&req.code, &req.label) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if req.rank < 0 {
        return Ok(bad_request(ErrorCode::BadRequest, "Rank must not be negative"));
    }

    match storage.create_level(req).await {
        Ok(level) => Ok(HttpResponse::Created().json(ApiResponse::success(
            level,
            "Level created successfully",
        ))),
        Err(e) => Ok(storage_error(&e, ErrorCode::CodeAlreadyExists)),
    }
}

pub async fn update_level(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
    req: UpdateLevelRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if req.rank.is_some_and(|rank| rank < 0) {
        return Ok(bad_request(ErrorCode::BadRequest, "Rank must not be negative"));
    }

    match storage.update_level(id, req).await {
        Ok(Some(level)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            level,
            "Level updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::LevelNotFound, "Level not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

pub async fn delete_level(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    Ok(deleted(
        storage.delete_level(id).await,
        ErrorCode::LevelNotFound,
        "Level",
    ))
}

// ============================================
// 科目
// ============================================

pub async fn list_subjects(
    service: &AcademicService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_subjects().await {
        Ok(subjects) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(subjects),
            "Subjects retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn create_subject(
    service: &AcademicService,
    request: &HttpRequest,
    mut req: CreateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    req.code = req.code.trim().to_string();
    if let Err(msg) = check_code_and_label(&req.code, &req.label) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Some(Err(msg)) = req.coefficient.map(validate_coefficient) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    match storage.create_subject(req).await {
        Ok(subject) => Ok(HttpResponse::Created().json(ApiResponse::success(
            subject,
            "Subject created successfully",
        ))),
        Err(e) => Ok(storage_error(&e, ErrorCode::CodeAlreadyExists)),
    }
}

pub async fn update_subject(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
    req: UpdateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(Err(msg)) = req.coefficient.map(validate_coefficient) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    match storage.update_subject(id, req).await {
        Ok(Some(subject)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            subject,
            "Subject updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

pub async fn delete_subject(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    Ok(deleted(
        storage.delete_subject(id).await,
        ErrorCode::SubjectNotFound,
        "Subject",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_and_label() {
        assert!(check_code_and_label("INFO-L1", "Informatique L1").is_ok());
        assert!(check_code_and_label("bad code", "x").is_err());
        assert!(check_code_and_label("MATH", "  ").is_err());
    }

    #[test]
    fn test_deleted_maps_results() {
        let resp = deleted(Ok(false), ErrorCode::LevelNotFound, "Level");
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
        let resp = deleted(Ok(true), ErrorCode::LevelNotFound, "Level");
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    }
}
