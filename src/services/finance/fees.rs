use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FinanceService;
use crate::models::finance::requests::{
    ClassFeeListParams, CreateClassFeeRequest, CreateFeeTypeRequest, UpdateFeeTypeRequest,
};
use crate::models::{ApiResponse, ErrorCode, ItemsResponse};
use crate::services::{bad_request, not_found, read_error, storage_error};
use crate::utils::validate::{validate_code, validate_required};

fn check_amount(amount: f64) -> Result<(), &'static str> {
    if !amount.is_finite() || amount < 0.0 {
        return Err("Amount must be a non-negative number");
    }
    Ok(())
}

pub async fn list_fee_types(
    service: &FinanceService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_fee_types().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(items),
            "Fee types retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn create_fee_type(
    service: &FinanceService,
    request: &HttpRequest,
    mut req: CreateFeeTypeRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    req.code = req.code.trim().to_string();
    req.label = req.label.trim().to_string();
    if let Err(msg) = validate_code(&req.code) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Err(msg) = validate_required(&req.label, "label") {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Err(msg) = check_amount(req.amount) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    match storage.create_fee_type(req).await {
        Ok(fee_type) => {
            tracing::info!("Fee type {} created", fee_type.code);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                fee_type,
                "Fee type created successfully",
            )))
        }
        Err(e) => Ok(storage_error(&e, ErrorCode::CodeAlreadyExists)),
    }
}

pub async fn update_fee_type(
    service: &FinanceService,
    request: &HttpRequest,
    fee_type_id: i64,
    mut req: UpdateFeeTypeRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(label) = req.label.as_mut() {
        *label = label.trim().to_string();
        if let Err(msg) = validate_required(label, "label") {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
    }
    if let Some(Err(msg)) = req.amount.map(check_amount) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    match storage.update_fee_type(fee_type_id, req).await {
        Ok(Some(fee_type)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            fee_type,
            "Fee type updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::FeeTypeNotFound, "Fee type not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

pub async fn list_class_fees(
    service: &FinanceService,
    request: &HttpRequest,
    params: ClassFeeListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_class_fees(params).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(items),
            "Class fees retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

/// 未给出金额时沿用费用类型的默认金额
pub async fn create_class_fee(
    service: &FinanceService,
    request: &HttpRequest,
    req: CreateClassFeeRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let fee_type = match storage.get_fee_type(req.fee_type_id).await {
        Ok(Some(fee_type)) => fee_type,
        Ok(None) => return Ok(not_found(ErrorCode::FeeTypeNotFound, "Fee type not found")),
        Err(e) => return Ok(read_error(&e)),
    };
    match storage.get_class(req.class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => return Ok(read_error(&e)),
    }
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

    let amount = req.amount.unwrap_or(fee_type.amount);
    if let Err(msg) = check_amount(amount) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    match storage
        .create_class_fee(req.class_id, req.fee_type_id, amount, req.academic_year_id)
        .await
    {
        Ok(class_fee) => Ok(HttpResponse::Created().json(ApiResponse::success(
            class_fee,
            "Class fee created successfully",
        ))),
        Err(e) => Ok(storage_error(&e, ErrorCode::ClassFeeAlreadyExists)),
    }
}

pub async fn delete_class_fee(
    service: &FinanceService,
    request: &HttpRequest,
    class_fee_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_class_fee(class_fee_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
            "Class fee deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::ClassFeeNotFound, "Class fee not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::ResourceInUse)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_amount() {
        assert!(check_amount(0.0).is_ok());
        assert!(check_amount(150_000.0).is_ok());
        assert!(check_amount(-1.0).is_err());
        assert!(check_amount(f64::NAN).is_err());
    }
}
