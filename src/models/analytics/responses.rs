use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 预警等级
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub enum AlertLevel {
    Low,
    Medium,
    High,
}

/// 单个风险因素
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct RiskFactor {
    pub code: String,
    pub description: String,
    pub weight: i32,
    pub recommendation: String,
}

/// 学生风险评估
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct RiskReport {
    pub student_id: i64,
    pub general_average: Option<f64>,
    pub recent_absences: i64,
    pub balance: f64,
    pub factors: Vec<RiskFactor>,
    pub score: i32,
    pub success_probability: i32,
    pub alert_level: AlertLevel,
    pub recommendations: Vec<String>,
}

/// 月度（30 天）趋势点
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct TrendPoint {
    pub period_start: chrono::NaiveDate,
    pub period_end: chrono::NaiveDate,
    pub enrollments: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct ProgramHeadcount {
    pub program_id: i64,
    pub program_label: String,
    pub students: i64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct TopStudent {
    pub student_id: i64,
    pub student_number: String,
    pub full_name: String,
    pub general_average: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct AnalyticsDashboard {
    pub total_students: i64,
    pub total_teachers: i64,
    pub total_classes: i64,
    pub pass_rate: f64,
    pub total_revenue: f64,
    pub trends: Vec<TrendPoint>,
    pub students_per_program: Vec<ProgramHeadcount>,
    pub top_students: Vec<TopStudent>,
}

/// 某一自然年的入学人数
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct YearEnrollment {
    pub year: i32,
    pub enrollments: i64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub enum TrendDirection {
    Growth,
    Decline,
    Stable,
}

/// 下一年入学人数预测
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct EnrollmentPrediction {
    /// 最近的年份在前
    pub history: Vec<YearEnrollment>,
    pub predicted_year: i32,
    pub predicted_enrollments: i64,
    pub trend: TrendDirection,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct StrongSubject {
    pub subject_id: i64,
    pub subject_label: String,
    pub average: f64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct PathwayRecommendation {
    pub pathway: String,
    pub score: f64,
    pub reason: String,
}

/// 基于优势科目的方向建议
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct PathwayReport {
    pub student_id: i64,
    pub strong_subjects: Vec<StrongSubject>,
    pub recommendations: Vec<PathwayRecommendation>,
}
