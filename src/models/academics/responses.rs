use super::entities::ClassDetail;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct ClassListResponse {
    pub items: Vec<ClassDetail>,
    pub pagination: PaginationInfo,
}

/// 管理后台首页统计
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct DashboardStats {
    pub active_students: i64,
    pub active_teachers: i64,
    pub active_classes: i64,
    pub pass_rate: f64,
    pub payments_this_month: f64,
    pub absences_this_month: i64,
}
