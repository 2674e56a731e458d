//! 通知实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub kind: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_notification(self) -> crate::models::communication::entities::Notification {
        use crate::models::communication::entities::{Notification, NotificationKind};

        Notification {
            id: self.id,
            user_id: self.user_id,
            kind: self
                .kind
                .parse::<NotificationKind>()
                .unwrap_or(NotificationKind::System),
            title: self.title,
            message: self.message,
            link: self.link,
            is_read: self.is_read,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
