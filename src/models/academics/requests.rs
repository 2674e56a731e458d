use super::entities::Weekday;
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct CreateAcademicYearRequest {
    pub code: String,
    pub label: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct UpdateAcademicYearRequest {
    pub label: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct CreateProgramRequest {
    pub code: String,
    pub label: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct UpdateProgramRequest {
    pub label: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct CreateLevelRequest {
    pub code: String,
    pub label: String,
    pub rank: i32,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct UpdateLevelRequest {
    pub label: Option<String>,
    pub rank: Option<i32>,
    pub is_active: Option<bool>,
}

/// 班级列表过滤
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct ClassListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub program_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub level_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub academic_year_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct CreateClassRequest {
    pub code: String,
    pub label: String,
    pub program_id: i64,
    pub level_id: i64,
    pub academic_year_id: i64,
    pub capacity: Option<i32>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct UpdateClassRequest {
    pub label: Option<String>,
    pub program_id: Option<i64>,
    pub level_id: Option<i64>,
    pub academic_year_id: Option<i64>,
    pub capacity: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct CreateSubjectRequest {
    pub code: String,
    pub label: String,
    pub coefficient: Option<f64>,
    pub hours: Option<i32>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct UpdateSubjectRequest {
    pub label: Option<String>,
    pub coefficient: Option<f64>,
    pub hours: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct AssignSubjectRequest {
    pub class_id: i64,
    pub subject_id: i64,
    pub teacher_id: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct CreateTimetableSlotRequest {
    pub class_id: i64,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub weekday: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
}

/// 可选的班级过滤
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct ClassFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
}
