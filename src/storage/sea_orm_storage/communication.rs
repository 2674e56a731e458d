//! 公告、站内信与通知

use super::{SeaOrmStorage, write_error};
use crate::entity::prelude::*;
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginatedResponse, PaginationQuery,
    communication::{
        entities::{Announcement, Message, NewNotification, Notification},
        requests::{CreateAnnouncementRequest, SendMessageRequest},
    },
    users::entities::UserRole,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    // ==================== 公告 ====================

    /// 仅返回该角色当前可见的公告
    pub async fn list_announcements_impl(
        &self,
        role: UserRole,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Announcement>> {
        use crate::entity::announcements::Column;

        let now = chrono::Utc::now().timestamp();

        let select = Announcements::find()
            .filter(Column::IsPublished.eq(true))
            .filter(Column::PublishedAt.lte(now))
            .filter(
                Condition::any()
                    .add(Column::ExpiresAt.is_null())
                    .add(Column::ExpiresAt.gt(now)),
            )
            .filter(
                Condition::any()
                    .add(Column::TargetRole.is_null())
                    .add(Column::TargetRole.eq(role.as_str())),
            )
            .order_by_desc(Column::PublishedAt);

        let (items, pagination) = self.fetch_page(select, &pagination, "公告").await?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(|m| m.into_announcement()).collect(),
            pagination,
        })
    }

    pub async fn get_announcement_impl(&self, id: i64) -> Result<Option<Announcement>> {
        let result = Announcements::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询公告失败: {e}")))?;

        Ok(result.map(|m| m.into_announcement()))
    }

    pub async fn create_announcement_impl(
        &self,
        author_id: i64,
        req: CreateAnnouncementRequest,
    ) -> Result<Announcement> {
        let now = chrono::Utc::now().timestamp();

        let announcement = AnnouncementActiveModel {
            title: Set(req.title),
            content: Set(req.content),
            author_id: Set(author_id),
            target_role: Set(req.target_role.map(|r| r.to_string())),
            is_published: Set(true),
            published_at: Set(now),
            expires_at: Set(req.expires_at.map(|t| t.timestamp())),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error("创建公告失败", e))?;

        Ok(announcement.into_announcement())
    }

    pub async fn delete_announcement_impl(&self, id: i64) -> Result<bool> {
        let result = Announcements::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除公告失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    // ==================== 站内信 ====================

    pub async fn send_message_impl(
        &self,
        sender_id: i64,
        req: SendMessageRequest,
    ) -> Result<Message> {
        let message = MessageActiveModel {
            sender_id: Set(sender_id),
            recipient_id: Set(req.recipient_id),
            subject: Set(req.subject),
            body: Set(req.body),
            is_read: Set(false),
            read_at: Set(None),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error("发送消息失败", e))?;

        Ok(message.into_message())
    }

    pub async fn list_inbox_impl(
        &self,
        user_id: i64,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Message>> {
        use crate::entity::messages::Column;

        let select = Messages::find()
            .filter(Column::RecipientId.eq(user_id))
            .order_by_desc(Column::CreatedAt);

        let (items, pagination) = self.fetch_page(select, &pagination, "收件箱").await?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(|m| m.into_message()).collect(),
            pagination,
        })
    }

    pub async fn list_sent_messages_impl(
        &self,
        user_id: i64,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Message>> {
        use crate::entity::messages::Column;

        let select = Messages::find()
            .filter(Column::SenderId.eq(user_id))
            .order_by_desc(Column::CreatedAt);

        let (items, pagination) = self.fetch_page(select, &pagination, "已发送消息").await?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(|m| m.into_message()).collect(),
            pagination,
        })
    }

    pub async fn get_message_impl(&self, id: i64) -> Result<Option<Message>> {
        let result = Messages::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询消息失败: {e}")))?;

        Ok(result.map(|m| m.into_message()))
    }

    /// 已读的消息保持首次阅读时间
    pub async fn mark_message_read_impl(&self, id: i64) -> Result<Option<Message>> {
        let Some(existing) = self.get_message_impl(id).await? else {
            return Ok(None);
        };
        if existing.is_read {
            return Ok(Some(existing));
        }

        let updated = MessageActiveModel {
            id: Set(id),
            is_read: Set(true),
            read_at: Set(Some(chrono::Utc::now().timestamp())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| CampusError::database_operation(format!("标记消息已读失败: {e}")))?;

        Ok(Some(updated.into_message()))
    }

    // ==================== 通知 ====================

    pub async fn create_notification_impl(
        &self,
        notification: NewNotification,
    ) -> Result<Notification> {
        let model = NotificationActiveModel {
            user_id: Set(notification.user_id),
            kind: Set(notification.kind.to_string()),
            title: Set(notification.title),
            message: Set(notification.message),
            link: Set(notification.link),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("创建通知失败: {e}")))?;

        Ok(result.into_notification())
    }

    pub async fn list_notifications_impl(
        &self,
        user_id: i64,
        unread_only: bool,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Notification>> {
        use crate::entity::notifications::Column;

        let mut select = Notifications::find().filter(Column::UserId.eq(user_id));
        if unread_only {
            select = select.filter(Column::IsRead.eq(false));
        }
        select = select.order_by_desc(Column::CreatedAt);

        let (items, pagination) = self.fetch_page(select, &pagination, "通知").await?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(|m| m.into_notification()).collect(),
            pagination,
        })
    }

    pub async fn count_unread_notifications_impl(&self, user_id: i64) -> Result<u64> {
        use crate::entity::notifications::Column;

        Notifications::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计未读通知失败: {e}")))
    }

    /// 只能标记自己的通知
    pub async fn mark_notification_read_impl(&self, id: i64, user_id: i64) -> Result<bool> {
        use crate::entity::notifications::Column;

        let result = Notifications::update_many()
            .col_expr(Column::IsRead, sea_orm::sea_query::Expr::value(true))
            .filter(Column::Id.eq(id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("标记通知已读失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn mark_all_notifications_read_impl(&self, user_id: i64) -> Result<u64> {
        use crate::entity::notifications::Column;

        let result = Notifications::update_many()
            .col_expr(Column::IsRead, sea_orm::sea_query::Expr::value(true))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("标记通知已读失败: {e}")))?;

        Ok(result.rows_affected)
    }
}
