//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod absences;
pub mod academic_years;
pub mod action_logs;
pub mod announcements;
pub mod averages;
pub mod book_copies;
pub mod books;
pub mod class_fees;
pub mod class_subjects;
pub mod classes;
pub mod export_logs;
pub mod fee_types;
pub mod fines;
pub mod grade_history;
pub mod grades;
pub mod installments;
pub mod levels;
pub mod loans;
pub mod login_logs;
pub mod messages;
pub mod notifications;
pub mod parent_students;
pub mod parents;
pub mod password_resets;
pub mod payments;
pub mod programs;
pub mod rankings;
pub mod reservations;
pub mod students;
pub mod subjects;
pub mod system_settings;
pub mod system_settings_audit;
pub mod teachers;
pub mod timetable_slots;
pub mod users;

use chrono::{DateTime, NaiveDate, Utc};

/// 日期列统一以 `YYYY-MM-DD` 存储
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

pub(crate) fn to_date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, DATE_FORMAT).unwrap_or_default()
}

pub(crate) fn date_to_string(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_column_round_trip() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        assert_eq!(date_to_string(date), "2025-09-01");
        assert_eq!(to_date("2025-09-01"), date);
        assert_eq!(to_date("garbage"), NaiveDate::default());
    }

    #[test]
    fn test_timestamp_conversion() {
        assert_eq!(to_datetime(0).timestamp(), 0);
        assert_eq!(to_datetime(1_700_000_000).timestamp(), 1_700_000_000);
    }
}
