use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::payments::parse_optional_date;
use super::{FinanceService, ensure_can_view_student};
use crate::models::finance::requests::CreateInstallmentRequest;
use crate::models::{ApiResponse, ErrorCode, ItemsResponse};
use crate::services::{bad_request, current_user, not_found, read_error, storage_error};

pub async fn create_installment(
    service: &FinanceService,
    request: &HttpRequest,
    req: CreateInstallmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if !req.total_amount.is_finite() || req.total_amount <= 0.0 {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "total_amount must be greater than zero",
        ));
    }
    let due_date = match parse_optional_date(req.due_date.as_deref()) {
        Ok(date) => date,
        Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
    };

    match storage.get_student_by_id(req.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(read_error(&e)),
    }
    match storage.get_fee_type(req.fee_type_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::FeeTypeNotFound, "Fee type not found")),
        Err(e) => return Ok(read_error(&e)),
    }

    match storage.create_installment(req, due_date).await {
        Ok(installment) => Ok(HttpResponse::Created().json(ApiResponse::success(
            installment,
            "Installment plan created successfully",
        ))),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

pub async fn list_student_installments(
    service: &FinanceService,
    request: &HttpRequest,
    student_id: i64,
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
    if let Err(resp) = ensure_can_view_student(storage.as_ref(), &user, &student).await {
        return Ok(resp);
    }

    match storage.list_student_installments(student_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(items),
            "Installments retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}
