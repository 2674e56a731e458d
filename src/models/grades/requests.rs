use super::entities::AbsenceType;
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::{deserialize_optional_bool, deserialize_optional_i64};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct CreateGradeRequest {
    pub student_id: i64,
    pub subject_id: i64,
    pub class_id: i64,
    pub grade_type: String,
    pub value: f64,
    pub coefficient: Option<f64>,
    pub graded_on: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct UpdateGradeRequest {
    pub value: f64,
    pub reason: Option<String>,
}

/// 成绩列表过滤
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct GradeListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub subject_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub validated_only: Option<bool>,
}

/// 存储层使用的成绩查询
#[derive(Debug, Clone, Default)]
pub struct GradeQuery {
    pub student_id: Option<i64>,
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub validated_only: bool,
    pub page: u64,
    pub size: u64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct CreateAbsenceRequest {
    pub student_id: i64,
    pub class_id: i64,
    pub subject_id: Option<i64>,
    pub absence_date: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub absence_type: Option<AbsenceType>,
    pub justification: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct JustifyAbsenceRequest {
    pub justification: String,
}
