use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserRole;

/// 公告
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/communication.ts")]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    /// 为空表示面向所有人
    pub target_role: Option<UserRole>,
    pub is_published: bool,
    pub published_at: chrono::DateTime<chrono::Utc>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Announcement {
    /// 对某角色在某时刻是否可见
    pub fn is_visible_to(&self, role: UserRole, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.is_published
            && self.published_at <= now
            && self.expires_at.is_none_or(|exp| exp > now)
            && self.target_role.is_none_or(|target| target == role)
    }
}

/// 站内信
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/communication.ts")]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub subject: Option<String>,
    pub body: String,
    pub is_read: bool,
    pub read_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 通知类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/communication.ts")]
pub enum NotificationKind {
    GradeValidated,
    PaymentValidated,
    PaymentRejected,
    NewMessage,
    Announcement,
    Library,
    System,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NotificationKind::GradeValidated => "grade_validated",
            NotificationKind::PaymentValidated => "payment_validated",
            NotificationKind::PaymentRejected => "payment_rejected",
            NotificationKind::NewMessage => "new_message",
            NotificationKind::Announcement => "announcement",
            NotificationKind::Library => "library",
            NotificationKind::System => "system",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grade_validated" => Ok(NotificationKind::GradeValidated),
            "payment_validated" => Ok(NotificationKind::PaymentValidated),
            "payment_rejected" => Ok(NotificationKind::PaymentRejected),
            "new_message" => Ok(NotificationKind::NewMessage),
            "announcement" => Ok(NotificationKind::Announcement),
            "library" => Ok(NotificationKind::Library),
            "system" => Ok(NotificationKind::System),
            _ => Err(format!("Invalid notification kind: {s}")),
        }
    }
}

/// 通知
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/communication.ts")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 新建通知
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn announcement(target: Option<UserRole>) -> Announcement {
        let now = Utc::now();
        Announcement {
            id: 1,
            title: "Rentrée".into(),
            content: "Bienvenue".into(),
            author_id: 1,
            target_role: target,
            is_published: true,
            published_at: now - Duration::hours(1),
            expires_at: Some(now + Duration::days(1)),
            created_at: now,
        }
    }

    #[test]
    fn test_announcement_targeting() {
        let now = Utc::now();
        assert!(announcement(None).is_visible_to(UserRole::Parent, now));
        assert!(announcement(Some(UserRole::Student)).is_visible_to(UserRole::Student, now));
        assert!(!announcement(Some(UserRole::Student)).is_visible_to(UserRole::Teacher, now));
    }

    #[test]
    fn test_announcement_expiry_and_publication() {
        let now = Utc::now();
        let mut a = announcement(None);
        assert!(!a.is_visible_to(UserRole::Student, now + Duration::days(2)));
        a.is_published = false;
        assert!(!a.is_visible_to(UserRole::Student, now));
    }
}
