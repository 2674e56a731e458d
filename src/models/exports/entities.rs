use serde::Serialize;
use ts_rs::TS;

/// 导出记录
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exports.ts")]
pub struct ExportLog {
    pub id: i64,
    pub user_id: i64,
    pub kind: String,
    pub format: String,
    pub filename: String,
    pub parameters: Option<String>,
    pub row_count: i64,
    pub size_bytes: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 写入导出记录时使用
#[derive(Debug, Clone)]
pub struct NewExportLog {
    pub user_id: i64,
    pub kind: &'static str,
    pub format: &'static str,
    pub filename: String,
    pub parameters: Option<String>,
    pub row_count: i64,
    pub size_bytes: i64,
}
