use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::PaginationQuery;
use crate::models::communication::requests::{
    CreateAnnouncementRequest, NotificationListParams, SendMessageRequest,
};
use crate::models::users::requests::UserSearchParams;
use crate::services::{CommunicationService, SystemService};
use crate::utils::SafeIDI64;

// 懒加载的全局 CommunicationService 实例
static COMMUNICATION_SERVICE: Lazy<CommunicationService> =
    Lazy::new(CommunicationService::new_lazy);
static SYSTEM_SERVICE: Lazy<SystemService> = Lazy::new(SystemService::new_lazy);

// 公告
pub async fn list_announcements(
    req: HttpRequest,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE
        .list_announcements(&req, query.into_inner())
        .await
}

pub async fn get_announcement(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE.get_announcement(&req, id.0).await
}

pub async fn create_announcement(
    req: HttpRequest,
    data: web::Json<CreateAnnouncementRequest>,
) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE
        .create_announcement(&req, data.into_inner())
        .await
}

pub async fn delete_announcement(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE.delete_announcement(&req, id.0).await
}

// 私信
pub async fn inbox(
    req: HttpRequest,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE.inbox(&req, query.into_inner()).await
}

pub async fn sent(
    req: HttpRequest,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE.sent(&req, query.into_inner()).await
}

pub async fn send_message(
    req: HttpRequest,
    data: web::Json<SendMessageRequest>,
) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE
        .send_message(&req, data.into_inner())
        .await
}

pub async fn mark_message_read(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE.mark_message_read(&req, id.0).await
}

// 通知
pub async fn list_notifications(
    req: HttpRequest,
    query: web::Query<NotificationListParams>,
) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE
        .list_notifications(&req, query.into_inner())
        .await
}

pub async fn unread_count(req: HttpRequest) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE.unread_count(&req).await
}

pub async fn mark_notification_read(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE.mark_notification_read(&req, id.0).await
}

pub async fn mark_all_notifications_read(req: HttpRequest) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE.mark_all_notifications_read(&req).await
}

pub async fn search_users(
    req: HttpRequest,
    query: web::Query<UserSearchParams>,
) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE
        .search_users(&req, query.into_inner())
        .await
}

pub async fn public_settings(req: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.list_public_settings(&req).await
}

// 配置路由
pub fn configure_communication_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/common")
            .wrap(middlewares::RequireJWT)
            .route("/announcements", web::get().to(list_announcements))
            .route("/announcements", web::post().to(create_announcement))
            .route("/announcements/{id}", web::get().to(get_announcement))
            .route("/announcements/{id}", web::delete().to(delete_announcement))
            .route("/messages/inbox", web::get().to(inbox))
            .route("/messages/sent", web::get().to(sent))
            .route("/messages", web::post().to(send_message))
            .route("/messages/{id}/read", web::post().to(mark_message_read))
            .route("/notifications", web::get().to(list_notifications))
            .route("/notifications/unread-count", web::get().to(unread_count))
            .route(
                "/notifications/read-all",
                web::post().to(mark_all_notifications_read),
            )
            .route(
                "/notifications/{id}/read",
                web::post().to(mark_notification_read),
            )
            .route("/users/search", web::get().to(search_users))
            .route("/settings", web::get().to(public_settings)),
    );
}
