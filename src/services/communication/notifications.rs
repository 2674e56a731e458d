use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CommunicationService;
use crate::models::communication::requests::NotificationListParams;
use crate::models::communication::responses::{MarkAllReadResponse, UnreadCountResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, not_found, read_error, storage_error};

pub async fn list_notifications(
    service: &CommunicationService,
    request: &HttpRequest,
    params: NotificationListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match storage
        .list_notifications(
            user.id,
            params.unread_only.unwrap_or(false),
            params.pagination,
        )
        .await
    {
        Ok(notifications) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            notifications,
            "Notifications retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn unread_count(
    service: &CommunicationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match storage.count_unread_notifications(user.id).await {
        Ok(count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UnreadCountResponse {
                unread_count: count as i64,
            },
            "Unread count retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn mark_read(
    service: &CommunicationService,
    request: &HttpRequest,
    notification_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    // 按 user_id 过滤，别人的通知视为不存在
    match storage.mark_notification_read(notification_id, user.id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
            "Notification marked as read",
        ))),
        Ok(false) => Ok(not_found(
            ErrorCode::NotificationNotFound,
            "Notification not found",
        )),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

pub async fn mark_all_read(
    service: &CommunicationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match storage.mark_all_notifications_read(user.id).await {
        Ok(count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MarkAllReadResponse {
                marked_count: count as i64,
            },
            "All notifications marked as read",
        ))),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}
