use super::entities::{Decision, Grade, SubjectAverage};
use crate::models::common::PaginationInfo;
use crate::models::users::entities::StudentSummary;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct GradeListResponse {
    pub items: Vec<Grade>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct AveragesResponse {
    pub items: Vec<SubjectAverage>,
    pub general_average: Option<f64>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct RankingResponse {
    pub rank: Option<i32>,
    pub general_average: Option<f64>,
    pub total_students: i64,
    pub period: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct ReportCardLine {
    pub subject_id: i64,
    pub subject_label: String,
    pub coefficient: f64,
    pub average: f64,
}

/// 成绩单（JSON 形式）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct ReportCard {
    pub school_name: String,
    pub student: StudentSummary,
    pub academic_year_label: Option<String>,
    pub period: String,
    pub subjects: Vec<ReportCardLine>,
    pub general_average: Option<f64>,
    pub rank: Option<i32>,
    pub total_students: i64,
    pub pass_threshold: f64,
    pub decision: Option<Decision>,
    pub absences: i64,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// 欠费锁定时返回的数据
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct UnpaidLockResponse {
    pub has_unpaid: bool,
    pub balance: f64,
}

/// 某一学年的升级结论，由该学年的年度平均分推出
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct AcademicDecision {
    pub academic_year_id: Option<i64>,
    pub academic_year_label: Option<String>,
    pub general_average: f64,
    pub pass_threshold: f64,
    pub decision: Decision,
    pub subjects: usize,
}
