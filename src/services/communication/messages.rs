use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CommunicationService;
use crate::models::communication::entities::{NewNotification, NotificationKind};
use crate::models::communication::requests::SendMessageRequest;
use crate::models::{ApiResponse, ErrorCode, PaginationQuery};
use crate::services::{
    bad_request, current_user, forbidden, not_found, notify, read_error, storage_error,
};
use crate::utils::validate::validate_required;

pub async fn list_inbox(
    service: &CommunicationService,
    request: &HttpRequest,
    pagination: PaginationQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match storage.list_inbox(user.id, pagination).await {
        Ok(messages) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            messages,
            "Inbox retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn list_sent(
    service: &CommunicationService,
    request: &HttpRequest,
    pagination: PaginationQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match storage.list_sent_messages(user.id, pagination).await {
        Ok(messages) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            messages,
            "Sent messages retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

/// 发送站内信并通知收件人
pub async fn send_message(
    service: &CommunicationService,
    request: &HttpRequest,
    mut req: SendMessageRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(msg) = validate_required(&req.body, "body") {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    req.subject = req
        .subject
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match storage.get_user_by_id(req.recipient_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "Recipient not found")),
        Err(e) => return Ok(read_error(&e)),
    }

    match storage.send_message(user.id, req).await {
        Ok(message) => {
            notify(
                storage.as_ref(),
                NewNotification {
                    user_id: message.recipient_id,
                    kind: NotificationKind::NewMessage,
                    title: "New message".to_string(),
                    message: format!("You have a new message from {}", user.full_name()),
                    link: Some("/common/messages/inbox".to_string()),
                },
            )
            .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                message,
                "Message sent successfully",
            )))
        }
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

/// 只有收件人可以标记已读
pub async fn mark_read(
    service: &CommunicationService,
    request: &HttpRequest,
    message_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match storage.get_message(message_id).await {
        Ok(Some(message)) if message.recipient_id == user.id => {}
        Ok(Some(_)) => {
            return Ok(forbidden(
                ErrorCode::Forbidden,
                "Only the recipient can mark a message as read",
            ));
        }
        Ok(None) => return Ok(not_found(ErrorCode::MessageNotFound, "Message not found")),
        Err(e) => return Ok(read_error(&e)),
    }

    match storage.mark_message_read(message_id).await {
        Ok(Some(message)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            message,
            "Message marked as read",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::MessageNotFound, "Message not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}
