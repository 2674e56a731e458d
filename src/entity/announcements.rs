//! 公告实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "announcements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub author_id: i64,
    pub target_role: Option<String>,
    pub is_published: bool,
    pub published_at: i64,
    pub expires_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_announcement(self) -> crate::models::communication::entities::Announcement {
        use crate::models::users::entities::UserRole;

        crate::models::communication::entities::Announcement {
            id: self.id,
            title: self.title,
            content: self.content,
            author_id: self.author_id,
            target_role: self
                .target_role
                .and_then(|r| r.parse::<UserRole>().ok()),
            is_published: self.is_published,
            published_at: super::to_datetime(self.published_at),
            expires_at: self.expires_at.map(super::to_datetime),
            created_at: super::to_datetime(self.created_at),
        }
    }
}
