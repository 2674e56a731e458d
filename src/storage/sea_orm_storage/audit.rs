use super::{SeaOrmStorage, write_error};
use crate::entity::prelude::{
    ActionLogActiveModel, ActionLogs, ExportLogActiveModel, ExportLogs, LoginLogActiveModel,
    LoginLogs, PasswordResetActiveModel, PasswordResets, UserActiveModel,
};
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginatedResponse,
    audit::{
        entities::{ActionLog, LoginLog, NewActionLog, NewLoginLog, PasswordReset},
        requests::AuditLogParams,
    },
    exports::entities::{ExportLog, NewExportLog},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 记录登录尝试（成功或失败）
    pub async fn record_login_attempt_impl(&self, log: NewLoginLog) -> Result<()> {
        LoginLogActiveModel {
            user_id: Set(log.user_id),
            identifier: Set(log.identifier),
            success: Set(log.success),
            ip_address: Set(log.ip_address),
            user_agent: Set(log.user_agent),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| CampusError::database_operation(format!("写入登录日志失败: {e}")))?;

        Ok(())
    }

    /// 记录敏感操作
    pub async fn record_action_impl(&self, log: NewActionLog) -> Result<()> {
        ActionLogActiveModel {
            user_id: Set(log.user_id),
            action: Set(log.action.to_string()),
            entity_type: Set(log.entity_type.map(str::to_string)),
            entity_id: Set(log.entity_id),
            details: Set(log.details),
            ip_address: Set(log.ip_address),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| CampusError::database_operation(format!("写入操作日志失败: {e}")))?;

        Ok(())
    }

    /// 记录一次导出
    pub async fn record_export_impl(&self, log: NewExportLog) -> Result<ExportLog> {
        let model = ExportLogActiveModel {
            user_id: Set(log.user_id),
            kind: Set(log.kind.to_string()),
            format: Set(log.format.to_string()),
            filename: Set(log.filename),
            parameters: Set(log.parameters),
            row_count: Set(log.row_count),
            size_bytes: Set(log.size_bytes),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error("写入导出记录失败", e))?;

        Ok(model.into_log())
    }

    /// 用户最近的导出记录，新的在前
    pub async fn list_export_logs_impl(&self, user_id: i64, limit: u64) -> Result<Vec<ExportLog>> {
        use crate::entity::export_logs::Column;

        let logs = ExportLogs::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询导出记录失败: {e}")))?;

        Ok(logs.into_iter().map(|m| m.into_log()).collect())
    }

    pub async fn list_login_logs_impl(
        &self,
        params: AuditLogParams,
    ) -> Result<PaginatedResponse<LoginLog>> {
        use crate::entity::login_logs::Column;

        let mut select = LoginLogs::find();
        if let Some(user_id) = params.user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }
        select = select.order_by_desc(Column::CreatedAt);

        let (logs, pagination) = self
            .fetch_page(select, &params.pagination, "登录日志")
            .await?;

        Ok(PaginatedResponse {
            items: logs.into_iter().map(|m| m.into_log()).collect(),
            pagination,
        })
    }

    pub async fn list_action_logs_impl(
        &self,
        params: AuditLogParams,
    ) -> Result<PaginatedResponse<ActionLog>> {
        use crate::entity::action_logs::Column;

        let mut select = ActionLogs::find();
        if let Some(user_id) = params.user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }
        select = select.order_by_desc(Column::CreatedAt);

        let (logs, pagination) = self
            .fetch_page(select, &params.pagination, "操作日志")
            .await?;

        Ok(PaginatedResponse {
            items: logs.into_iter().map(|m| m.into_log()).collect(),
            pagination,
        })
    }

    pub async fn create_password_reset_impl(
        &self,
        user_id: i64,
        token: &str,
        expires_at: i64,
    ) -> Result<PasswordReset> {
        let model = PasswordResetActiveModel {
            user_id: Set(user_id),
            token: Set(token.to_string()),
            expires_at: Set(expires_at),
            used: Set(false),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error("创建重置令牌失败", e))?;

        Ok(model.into_reset())
    }

    pub async fn get_password_reset_impl(&self, token: &str) -> Result<Option<PasswordReset>> {
        use crate::entity::password_resets::Column;

        let result = PasswordResets::find()
            .filter(Column::Token.eq(token))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询重置令牌失败: {e}")))?;

        Ok(result.map(|m| m.into_reset()))
    }

    /// 令牌只能使用一次：仅当 used = false 时才会更新
    pub async fn consume_password_reset_impl(
        &self,
        reset_id: i64,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool> {
        use crate::entity::password_resets::Column;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        let marked = PasswordResets::update_many()
            .col_expr(Column::Used, sea_orm::sea_query::Expr::value(true))
            .filter(Column::Id.eq(reset_id))
            .filter(Column::Used.eq(false))
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新重置令牌失败: {e}")))?;

        if marked.rows_affected == 0 {
            return Ok(false);
        }

        UserActiveModel {
            id: Set(user_id),
            password_hash: Set(password_hash.to_string()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| CampusError::database_operation(format!("重置密码失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(true)
    }
}
