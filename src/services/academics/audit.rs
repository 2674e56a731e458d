use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AcademicService;
use crate::models::audit::requests::AuditLogParams;
use crate::models::ApiResponse;
use crate::services::read_error;

pub async fn list_action_logs(
    service: &AcademicService,
    request: &HttpRequest,
    params: AuditLogParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_action_logs(params).await {
        Ok(logs) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            logs,
            "Action logs retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn list_login_logs(
    service: &AcademicService,
    request: &HttpRequest,
    params: AuditLogParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_login_logs(params).await {
        Ok(logs) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            logs,
            "Login logs retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}
