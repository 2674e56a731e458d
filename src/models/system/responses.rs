use serde::Serialize;
use ts_rs::TS;

use super::entities::TypedSetting;

/// 配置列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SettingsListResponse {
    pub settings: Vec<TypedSetting>,
}

/// 健康检查
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub uptime_seconds: i64,
}
