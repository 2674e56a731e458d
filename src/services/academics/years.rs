use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AcademicService;
use crate::models::academics::requests::{CreateAcademicYearRequest, UpdateAcademicYearRequest};
use crate::models::{ApiResponse, ErrorCode, ItemsResponse};
use crate::services::{bad_request, not_found, read_error, storage_error};
use crate::utils::validate::{parse_date, validate_code, validate_required};

/// 校验起止日期，开始必须早于结束
fn check_year_dates(start: &str, end: &str) -> Result<(), String> {
    let start_date = parse_date(start)?;
    let end_date = parse_date(end)?;
    if start_date >= end_date {
        return Err("Start date must be before end date".to_string());
    }
    Ok(())
}

pub async fn list_years(
    service: &AcademicService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_academic_years().await {
        Ok(years) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(years),
            "Academic years retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn create_year(
    service: &AcademicService,
    request: &HttpRequest,
    mut req: CreateAcademicYearRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    req.code = req.code.trim().to_string();
    if let Err(msg) = validate_code(&req.code) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Err(msg) = validate_required(&req.label, "label") {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Err(msg) = check_year_dates(&req.start_date, &req.end_date) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    req.start_date = req.start_date.trim().to_string();
    req.end_date = req.end_date.trim().to_string();

    match storage.create_academic_year(req).await {
        Ok(year) => {
            tracing::info!("Academic year {} created", year.code);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                year,
                "Academic year created successfully",
            )))
        }
        Err(e) => Ok(storage_error(&e, ErrorCode::CodeAlreadyExists)),
    }
}

pub async fn update_year(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
    req: UpdateAcademicYearRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let existing = match storage.get_academic_year(id).await {
        Ok(Some(year)) => year,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::AcademicYearNotFound,
                "Academic year not found",
            ));
        }
        Err(e) => return Ok(read_error(&e)),
    };

    // 只改一端时与另一端的现值比较
    if req.start_date.is_some() || req.end_date.is_some() {
        let start = req
            .start_date
            .clone()
            .unwrap_or_else(|| existing.start_date.to_string());
        let end = req
            .end_date
            .clone()
            .unwrap_or_else(|| existing.end_date.to_string());
        if let Err(msg) = check_year_dates(&start, &end) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
    }

    match storage.update_academic_year(id, req).await {
        Ok(Some(year)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            year,
            "Academic year updated successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::AcademicYearNotFound,
            "Academic year not found",
        )),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

pub async fn activate_year(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.activate_academic_year(id).await {
        Ok(Some(year)) => {
            tracing::info!("Academic year {} is now active", year.code);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                year,
                "Academic year activated successfully",
            )))
        }
        Ok(None) => Ok(not_found(
            ErrorCode::AcademicYearNotFound,
            "Academic year not found",
        )),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_dates() {
        assert!(check_year_dates("2024-09-01", "2025-07-15").is_ok());
        assert!(check_year_dates("2025-07-15", "2024-09-01").is_err());
        assert!(check_year_dates("2024-09-01", "2024-09-01").is_err());
        assert!(check_year_dates("2024/09/01", "2025-07-15").is_err());
    }
}
