use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_bool;
use crate::models::users::entities::UserRole;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/communication.ts")]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub content: String,
    pub target_role: Option<UserRole>,
    /// 过期时间（RFC 3339）
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/communication.ts")]
pub struct SendMessageRequest {
    pub recipient_id: i64,
    pub subject: Option<String>,
    pub body: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/communication.ts")]
pub struct NotificationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub unread_only: Option<bool>,
}
