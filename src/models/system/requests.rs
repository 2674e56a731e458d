use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

/// 更新配置请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct UpdateSettingRequest {
    /// 接受字符串或 JSON 标量
    pub value: serde_json::Value,
}

impl UpdateSettingRequest {
    /// 转换为存储用的字符串形式
    pub fn raw_value(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// 审计日志查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SettingAuditParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub key: Option<String>,
}
