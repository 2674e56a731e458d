use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::LibraryService;
use crate::models::library::entities::FineStatus;
use crate::models::library::requests::FineListParams;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, not_found, read_error, storage_error};

pub async fn list_fines(
    service: &LibraryService,
    request: &HttpRequest,
    params: FineListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_fines(params).await {
        Ok(fines) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            fines,
            "Fines retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn pay_fine(
    service: &LibraryService,
    request: &HttpRequest,
    fine_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_fine(fine_id).await {
        Ok(Some(fine)) if fine.status == FineStatus::Paid => {
            return Ok(bad_request(
                ErrorCode::FineAlreadyPaid,
                "Fine has already been paid",
            ));
        }
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::FineNotFound, "Fine not found")),
        Err(e) => return Ok(read_error(&e)),
    }

    match storage.pay_fine(fine_id).await {
        Ok(Some(fine)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            fine,
            "Fine paid successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::FineNotFound, "Fine not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::FineAlreadyPaid)),
    }
}
