use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 年度汇总使用的周期标识
pub const ANNUAL_PERIOD: &str = "annual";

/// 成绩
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct Grade {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub class_id: i64,
    pub grade_type: String,
    pub value: f64,
    pub coefficient: f64,
    pub graded_on: chrono::NaiveDate,
    pub teacher_id: i64,
    pub comment: Option<String>,
    pub is_validated: bool,
    pub validated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 成绩修改记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct GradeHistory {
    pub id: i64,
    pub grade_id: i64,
    pub old_value: f64,
    pub new_value: f64,
    pub modified_by: i64,
    pub reason: Option<String>,
    pub modified_at: chrono::DateTime<chrono::Utc>,
}

/// 学生某科目的平均分
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct SubjectAverage {
    pub student_id: i64,
    pub subject_id: i64,
    pub class_id: i64,
    pub subject_label: String,
    pub coefficient: f64,
    pub value: f64,
    pub period: String,
}

/// 班级排名
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct Ranking {
    pub student_id: i64,
    pub class_id: i64,
    pub rank: i32,
    pub general_average: f64,
    pub period: String,
}

/// 缺勤类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub enum AbsenceType {
    Justified,
    Unjustified,
    Late,
}

impl<'de> Deserialize<'de> for AbsenceType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<AbsenceType>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的缺勤类型: '{s}'. 支持: justified, unjustified, late"
            ))
        })
    }
}

impl std::fmt::Display for AbsenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbsenceType::Justified => write!(f, "justified"),
            AbsenceType::Unjustified => write!(f, "unjustified"),
            AbsenceType::Late => write!(f, "late"),
        }
    }
}

impl std::str::FromStr for AbsenceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "justified" => Ok(AbsenceType::Justified),
            "unjustified" => Ok(AbsenceType::Unjustified),
            "late" => Ok(AbsenceType::Late),
            _ => Err(format!("Invalid absence type: {s}")),
        }
    }
}

/// 缺勤记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct Absence {
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub subject_id: Option<i64>,
    pub absence_date: chrono::NaiveDate,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub absence_type: AbsenceType,
    pub justification: Option<String>,
    pub teacher_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 成绩单结论
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub enum Decision {
    Admitted,
    Failed,
}
