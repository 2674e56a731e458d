//! 系统设置存储实现

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::entity::prelude::{SystemSettings, SystemSettingsAudit};
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginatedResponse,
    system::{
        entities::{SettingAudit, SystemSetting},
        requests::SettingAuditParams,
    },
};

use super::SeaOrmStorage;

impl SeaOrmStorage {
    /// 获取所有设置
    pub(crate) async fn list_all_settings_impl(&self) -> Result<Vec<SystemSetting>> {
        let settings = SystemSettings::find()
            .order_by(crate::entity::system_settings::Column::Key, Order::Asc)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("获取设置列表失败: {e}")))?;

        Ok(settings.into_iter().map(|s| s.into_setting()).collect())
    }

    /// 通过 key 获取设置
    pub(crate) async fn get_setting_by_key_impl(&self, key: &str) -> Result<Option<SystemSetting>> {
        let setting = SystemSettings::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("获取设置失败: {e}")))?;

        Ok(setting.map(|s| s.into_setting()))
    }

    /// 更新设置，并在同一事务内写入审计记录
    pub(crate) async fn update_setting_impl(
        &self,
        key: &str,
        value: &str,
        user_id: i64,
        ip_address: Option<String>,
    ) -> Result<SystemSetting> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        // 获取当前设置
        let existing = SystemSettings::find_by_id(key.to_string())
            .one(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("获取设置失败: {e}")))?
            .ok_or_else(|| CampusError::not_found(format!("配置项不存在: {key}")))?;

        let old_value = existing.value.clone();

        let mut active_model: crate::entity::system_settings::ActiveModel = existing.into();
        active_model.value = Set(value.to_string());
        active_model.updated_at = Set(now);
        active_model.updated_by = Set(Some(user_id));

        let updated = active_model
            .update(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新设置失败: {e}")))?;

        crate::entity::system_settings_audit::ActiveModel {
            setting_key: Set(key.to_string()),
            old_value: Set(Some(old_value)),
            new_value: Set(value.to_string()),
            changed_by: Set(user_id),
            changed_at: Set(now),
            ip_address: Set(ip_address),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| CampusError::database_operation(format!("创建审计日志失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated.into_setting())
    }

    /// 获取审计日志
    pub(crate) async fn list_setting_audits_impl(
        &self,
        params: SettingAuditParams,
    ) -> Result<PaginatedResponse<SettingAudit>> {
        use crate::entity::system_settings_audit::Column;

        let mut find = SystemSettingsAudit::find();

        if let Some(key) = &params.key {
            find = find.filter(Column::SettingKey.eq(key.as_str()));
        }

        find = find
            .order_by(Column::ChangedAt, Order::Desc)
            .order_by(Column::Id, Order::Desc);

        let (audits, pagination) = self
            .fetch_page(find, &params.pagination, "审计日志")
            .await?;

        Ok(PaginatedResponse {
            items: audits.into_iter().map(|a| a.into_audit()).collect(),
            pagination,
        })
    }
}
