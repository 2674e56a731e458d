use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 图书
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/library.ts")]
pub struct Book {
    pub id: i64,
    pub isbn: Option<String>,
    pub title: String,
    pub author: String,
    pub publisher: Option<String>,
    pub published_year: Option<i32>,
    pub language: Option<String>,
    pub category: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
    pub shelf_mark: Option<String>,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 馆藏副本
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/library.ts")]
pub struct BookCopy {
    pub id: i64,
    pub book_id: i64,
    pub copy_number: String,
    pub condition: String,
    pub acquired_on: Option<chrono::NaiveDate>,
    pub location: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/library.ts")]
pub enum LoanStatus {
    Active,
    Returned,
    Late,
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoanStatus::Active => write!(f, "active"),
            LoanStatus::Returned => write!(f, "returned"),
            LoanStatus::Late => write!(f, "late"),
        }
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(LoanStatus::Active),
            "returned" => Ok(LoanStatus::Returned),
            "late" => Ok(LoanStatus::Late),
            _ => Err(format!("Invalid loan status: {s}")),
        }
    }
}

/// 借阅记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/library.ts")]
pub struct Loan {
    pub id: i64,
    pub copy_id: i64,
    pub book_id: i64,
    pub borrower_id: i64,
    pub borrowed_on: chrono::NaiveDate,
    pub due_on: chrono::NaiveDate,
    pub returned_on: Option<chrono::NaiveDate>,
    pub status: LoanStatus,
    pub days_late: i32,
    pub book_title: Option<String>,
    pub copy_number: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/library.ts")]
pub enum FineStatus {
    Unpaid,
    Paid,
}

impl std::fmt::Display for FineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FineStatus::Unpaid => write!(f, "unpaid"),
            FineStatus::Paid => write!(f, "paid"),
        }
    }
}

impl std::str::FromStr for FineStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(FineStatus::Unpaid),
            "paid" => Ok(FineStatus::Paid),
            _ => Err(format!("Invalid fine status: {s}")),
        }
    }
}

/// 罚款
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/library.ts")]
pub struct Fine {
    pub id: i64,
    pub loan_id: i64,
    pub borrower_id: i64,
    pub kind: String,
    pub amount: f64,
    pub issued_on: chrono::NaiveDate,
    pub status: FineStatus,
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/library.ts")]
pub enum ReservationStatus {
    Active,
    Cancelled,
    Fulfilled,
    Expired,
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReservationStatus::Active => write!(f, "active"),
            ReservationStatus::Cancelled => write!(f, "cancelled"),
            ReservationStatus::Fulfilled => write!(f, "fulfilled"),
            ReservationStatus::Expired => write!(f, "expired"),
        }
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ReservationStatus::Active),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            "fulfilled" => Ok(ReservationStatus::Fulfilled),
            "expired" => Ok(ReservationStatus::Expired),
            _ => Err(format!("Invalid reservation status: {s}")),
        }
    }
}

/// 预约
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/library.ts")]
pub struct Reservation {
    pub id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub reserved_at: chrono::DateTime<chrono::Utc>,
    pub expires_on: chrono::NaiveDate,
    pub status: ReservationStatus,
    pub book_title: Option<String>,
}

/// 归还结算结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnOutcome {
    pub days_late: i64,
    pub fine: f64,
    pub status: LoanStatus,
}

impl ReturnOutcome {
    /// 逾期天数 = max(0, 归还日 - 应还日)，罚款 = 逾期天数 × 日罚金
    pub fn compute(due_on: chrono::NaiveDate, returned_on: chrono::NaiveDate, daily_fine: f64) -> Self {
        let days_late = (returned_on - due_on).num_days().max(0);
        Self {
            days_late,
            fine: days_late as f64 * daily_fine,
            status: if days_late > 0 {
                LoanStatus::Late
            } else {
                LoanStatus::Returned
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_return_on_time() {
        let outcome = ReturnOutcome::compute(date(15), date(10), 100.0);
        assert_eq!(outcome.days_late, 0);
        assert_eq!(outcome.fine, 0.0);
        assert_eq!(outcome.status, LoanStatus::Returned);
    }

    #[test]
    fn test_return_on_due_date_is_not_late() {
        let outcome = ReturnOutcome::compute(date(15), date(15), 100.0);
        assert_eq!(outcome.status, LoanStatus::Returned);
    }

    #[test]
    fn test_late_return_fine() {
        let outcome = ReturnOutcome::compute(date(15), date(18), 100.0);
        assert_eq!(outcome.days_late, 3);
        assert_eq!(outcome.fine, 300.0);
        assert_eq!(outcome.status, LoanStatus::Late);
    }
}
