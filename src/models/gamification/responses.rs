use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 徽章
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub enum Badge {
    Assiduous,
    FinanciallyExemplary,
    ExcellentStudent,
    GoodStudent,
}

/// 等级
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub enum PlayerLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
    Master,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub struct PointsResponse {
    pub student_id: i64,
    pub points: i64,
    pub level: PlayerLevel,
    /// 距离下一等级还差的积分，最高等级时为空
    pub points_to_next_level: Option<i64>,
    pub badges: Vec<Badge>,
}

/// 排行榜类型
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub enum LeaderboardKind {
    #[default]
    Points,
    Grades,
    Attendance,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub struct LeaderboardParams {
    #[serde(rename = "type", default)]
    pub kind: Option<LeaderboardKind>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub struct LeaderboardEntry {
    pub rank: i32,
    pub student_id: i64,
    pub full_name: String,
    pub score: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub struct LeaderboardResponse {
    pub kind: LeaderboardKind,
    pub items: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gamification.ts")]
pub struct Challenge {
    pub code: String,
    pub title: String,
    pub progress: i64,
    pub target: i64,
    pub completed: bool,
    pub reward_points: i64,
}
