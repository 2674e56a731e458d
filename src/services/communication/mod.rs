//! 通讯：公告、站内信、通知、用户搜索和公开的学校设置

pub mod announcements;
pub mod messages;
pub mod notifications;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::communication::requests::{
    CreateAnnouncementRequest, NotificationListParams, SendMessageRequest,
};
use crate::models::users::requests::UserSearchParams;
use crate::models::users::responses::UserSearchItem;
use crate::models::{ApiResponse, ErrorCode, ItemsResponse, PaginationQuery};
use crate::services::{bad_request, read_error};
use crate::storage::Storage;

/// 用户搜索的最少字符数
const SEARCH_MIN_CHARS: usize = 2;
const SEARCH_LIMIT: u64 = 20;

pub struct CommunicationService {
    storage: Option<Arc<dyn Storage>>,
}

impl CommunicationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 公告
    pub async fn list_announcements(
        &self,
        request: &HttpRequest,
        pagination: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        announcements::list_announcements(self, request, pagination).await
    }

    pub async fn get_announcement(
        &self,
        request: &HttpRequest,
        announcement_id: i64,
    ) -> ActixResult<HttpResponse> {
        announcements::get_announcement(self, request, announcement_id).await
    }

    pub async fn create_announcement(
        &self,
        request: &HttpRequest,
        req: CreateAnnouncementRequest,
    ) -> ActixResult<HttpResponse> {
        announcements::create_announcement(self, request, req).await
    }

    pub async fn delete_announcement(
        &self,
        request: &HttpRequest,
        announcement_id: i64,
    ) -> ActixResult<HttpResponse> {
        announcements::delete_announcement(self, request, announcement_id).await
    }

    // 站内信
    pub async fn inbox(
        &self,
        request: &HttpRequest,
        pagination: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        messages::list_inbox(self, request, pagination).await
    }

    pub async fn sent(
        &self,
        request: &HttpRequest,
        pagination: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        messages::list_sent(self, request, pagination).await
    }

    pub async fn send_message(
        &self,
        request: &HttpRequest,
        req: SendMessageRequest,
    ) -> ActixResult<HttpResponse> {
        messages::send_message(self, request, req).await
    }

    pub async fn mark_message_read(
        &self,
        request: &HttpRequest,
        message_id: i64,
    ) -> ActixResult<HttpResponse> {
        messages::mark_read(self, request, message_id).await
    }

    // 通知
    pub async fn list_notifications(
        &self,
        request: &HttpRequest,
        params: NotificationListParams,
    ) -> ActixResult<HttpResponse> {
        notifications::list_notifications(self, request, params).await
    }

    pub async fn unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        notifications::unread_count(self, request).await
    }

    pub async fn mark_notification_read(
        &self,
        request: &HttpRequest,
        notification_id: i64,
    ) -> ActixResult<HttpResponse> {
        notifications::mark_read(self, request, notification_id).await
    }

    pub async fn mark_all_notifications_read(
        &self,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        notifications::mark_all_read(self, request).await
    }

    /// 按用户名、姓名或邮箱搜索活跃用户
    pub async fn search_users(
        &self,
        request: &HttpRequest,
        params: UserSearchParams,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);

        let keyword = params.q.as_deref().map(str::trim).unwrap_or_default();
        if keyword.chars().count() < SEARCH_MIN_CHARS {
            return Ok(bad_request(
                ErrorCode::BadRequest,
                format!("Search query must be at least {SEARCH_MIN_CHARS} characters"),
            ));
        }

        match storage.search_users(keyword, SEARCH_LIMIT).await {
            Ok(users) => {
                let items: Vec<UserSearchItem> = users
                    .into_iter()
                    .filter(|u| u.is_active())
                    .map(UserSearchItem::from)
                    .collect();
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    ItemsResponse::new(items),
                    "Users retrieved successfully",
                )))
            }
            Err(e) => Ok(read_error(&e)),
        }
    }
}
