use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CommunicationService;
use crate::models::audit::entities::NewActionLog;
use crate::models::communication::requests::CreateAnnouncementRequest;
use crate::models::{ApiResponse, ErrorCode, PaginationQuery};
use crate::services::{
    bad_request, client_ip, current_user, forbidden, not_found, read_error, storage_error,
};
use crate::utils::validate::validate_required;

/// 当前角色可见、已发布且未过期的公告
pub async fn list_announcements(
    service: &CommunicationService,
    request: &HttpRequest,
    pagination: PaginationQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match storage.list_announcements(user.role, pagination).await {
        Ok(announcements) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            announcements,
            "Announcements retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn get_announcement(
    service: &CommunicationService,
    request: &HttpRequest,
    announcement_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match storage.get_announcement(announcement_id).await {
        // 管理员可以查看全部公告
        Ok(Some(announcement))
            if user.is_admin() || announcement.is_visible_to(user.role, chrono::Utc::now()) =>
        {
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                announcement,
                "Announcement retrieved successfully",
            )))
        }
        Ok(_) => Ok(not_found(
            ErrorCode::AnnouncementNotFound,
            "Announcement not found",
        )),
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn create_announcement(
    service: &CommunicationService,
    request: &HttpRequest,
    mut req: CreateAnnouncementRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if !user.is_admin() {
        return Ok(forbidden(
            ErrorCode::Forbidden,
            "Only administrators can publish announcements",
        ));
    }

    req.title = req.title.trim().to_string();
    if let Err(msg) = validate_required(&req.title, "title")
        .and_then(|_| validate_required(&req.content, "content"))
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if req.expires_at.is_some_and(|exp| exp <= chrono::Utc::now()) {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "expires_at must be in the future",
        ));
    }

    match storage.create_announcement(user.id, req).await {
        Ok(announcement) => {
            let log = NewActionLog::new(user.id, "announcement.create")
                .entity("announcement", announcement.id)
                .ip(client_ip(request));
            if let Err(e) = storage.record_action(log).await {
                tracing::warn!("Failed to record action log: {}", e);
            }
            Ok(HttpResponse::Created().json(ApiResponse::success(
                announcement,
                "Announcement published successfully",
            )))
        }
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

pub async fn delete_announcement(
    service: &CommunicationService,
    request: &HttpRequest,
    announcement_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if !user.is_admin() {
        return Ok(forbidden(
            ErrorCode::Forbidden,
            "Only administrators can delete announcements",
        ));
    }

    match storage.delete_announcement(announcement_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
            "Announcement deleted successfully",
        ))),
        Ok(false) => Ok(not_found(
            ErrorCode::AnnouncementNotFound,
            "Announcement not found",
        )),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}
