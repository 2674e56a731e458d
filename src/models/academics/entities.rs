use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 学年
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct AcademicYear {
    pub id: i64,
    pub code: String,
    pub label: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 专业
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct Program {
    pub id: i64,
    pub code: String,
    pub label: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 年级
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct Level {
    pub id: i64,
    pub code: String,
    pub label: String,
    pub rank: i32,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 班级
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct SchoolClass {
    pub id: i64,
    pub code: String,
    pub label: String,
    pub program_id: i64,
    pub level_id: i64,
    pub academic_year_id: i64,
    pub capacity: i32,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 带关联名称和当前人数的班级
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct ClassDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: SchoolClass,
    pub program_label: Option<String>,
    pub level_label: Option<String>,
    pub academic_year_label: Option<String>,
    pub headcount: i64,
}

impl ClassDetail {
    pub fn is_full(&self) -> bool {
        self.headcount >= self.class.capacity as i64
    }
}

/// 科目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct Subject {
    pub id: i64,
    pub code: String,
    pub label: String,
    pub coefficient: f64,
    pub hours: Option<i32>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 班级开设的科目及任课教师
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct ClassSubject {
    pub id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub subject_code: String,
    pub subject_label: String,
    pub coefficient: f64,
    pub teacher_name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 星期（周一至周六上课）
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
        }
    }
}

impl<'de> Deserialize<'de> for Weekday {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Weekday>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的星期: '{s}'. 支持: monday, tuesday, wednesday, thursday, friday, saturday"
            ))
        })
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "monday" => Ok(Weekday::Monday),
            "tuesday" => Ok(Weekday::Tuesday),
            "wednesday" => Ok(Weekday::Wednesday),
            "thursday" => Ok(Weekday::Thursday),
            "friday" => Ok(Weekday::Friday),
            "saturday" => Ok(Weekday::Saturday),
            _ => Err(format!("Invalid weekday: {s}")),
        }
    }
}

/// 课表时段
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct TimetableSlot {
    pub id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub weekday: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
    pub subject_label: Option<String>,
    pub teacher_name: Option<String>,
}

/// 按星期、开始时间排序
pub fn sort_timetable(slots: &mut [TimetableSlot]) {
    slots.sort_by(|a, b| {
        a.weekday
            .cmp(&b.weekday)
            .then_with(|| a.start_time.cmp(&b.start_time))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: i64, weekday: Weekday, start: &str) -> TimetableSlot {
        TimetableSlot {
            id,
            class_id: 1,
            subject_id: 1,
            teacher_id: 1,
            weekday,
            start_time: start.to_string(),
            end_time: "23:00".to_string(),
            room: None,
            subject_label: None,
            teacher_name: None,
        }
    }

    #[test]
    fn test_timetable_order() {
        let mut slots = vec![
            slot(1, Weekday::Saturday, "08:00"),
            slot(2, Weekday::Monday, "10:00"),
            slot(3, Weekday::Monday, "08:00"),
            slot(4, Weekday::Wednesday, "07:30"),
        ];
        sort_timetable(&mut slots);
        let ids: Vec<i64> = slots.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_weekday_parse() {
        assert_eq!("Friday".parse::<Weekday>().unwrap(), Weekday::Friday);
        assert!("sunday".parse::<Weekday>().is_err());
    }
}
