//! 学生财务状况与欠费锁定
//!
//! 应缴 = 学生所在班级在其学年的全部班级费用；已缴 = 已验证的缴费之和。
//! 欠费且最近一次已验证缴费早于 `finance.unpaid_lock_days` 天（或从未缴费）时锁定成绩查询。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;

use super::{FinanceService, ensure_can_view_student};
use crate::errors::Result;
use crate::models::finance::entities::{Installment, PaymentStatus};
use crate::models::finance::requests::ClassFeeListParams;
use crate::models::finance::responses::FinancialSituation;
use crate::models::grades::responses::UnpaidLockResponse;
use crate::models::users::entities::StudentProfile;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::system::DynamicConfig;
use crate::services::{current_user, not_found, read_error};
use crate::storage::Storage;
use crate::utils::round2;

/// 是否处于欠费锁定
pub(crate) fn is_locked(
    total_due: f64,
    total_paid: f64,
    last_payment_on: Option<NaiveDate>,
    today: NaiveDate,
    lock_days: i64,
) -> bool {
    if total_due <= total_paid {
        return false;
    }
    match last_payment_on {
        None => true,
        Some(last) => (today - last).num_days() > lock_days,
    }
}

/// 逾期分期计划的滞纳金，按剩余金额的百分比计
pub(crate) fn late_penalty(installments: &[Installment], today: NaiveDate, percent: f64) -> f64 {
    let overdue: f64 = installments
        .iter()
        .filter(|i| i.due_date.is_some_and(|due| due < today))
        .map(Installment::remaining)
        .sum();
    round2(overdue * percent / 100.0)
}

pub(crate) async fn compute_situation(
    storage: &dyn Storage,
    student: &StudentProfile,
    today: NaiveDate,
) -> Result<FinancialSituation> {
    let fees = match student.class_id {
        Some(class_id) => {
            storage
                .list_class_fees(ClassFeeListParams {
                    class_id: Some(class_id),
                    academic_year_id: student.academic_year_id,
                })
                .await?
        }
        None => Vec::new(),
    };
    let payments = storage.list_student_payments(student.id).await?;
    let installments = storage.list_student_installments(student.id).await?;

    let total_due = round2(fees.iter().map(|f| f.amount).sum());
    let validated = payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Validated);
    let total_paid = round2(validated.clone().map(|p| p.amount).sum());
    let last_payment_on = validated.map(|p| p.paid_on).max();

    let lock_days = DynamicConfig::unpaid_lock_days().await;
    let penalty_percent = DynamicConfig::late_payment_penalty().await;

    Ok(FinancialSituation {
        student_id: student.id,
        total_due,
        total_paid,
        balance: round2(total_due - total_paid),
        has_unpaid: total_due > total_paid,
        locked: is_locked(total_due, total_paid, last_payment_on, today, lock_days),
        last_payment_on,
        late_penalty: late_penalty(&installments, today, penalty_percent),
        fees,
        payments,
        installments,
    })
}

/// 成绩类接口的欠费拦截，锁定时返回 403 和欠费余额
pub(crate) async fn ensure_not_locked(
    storage: &dyn Storage,
    student: &StudentProfile,
) -> std::result::Result<(), HttpResponse> {
    let today = chrono::Local::now().date_naive();
    match compute_situation(storage, student, today).await {
        Ok(situation) if situation.locked => Err(HttpResponse::Forbidden().json(
            ApiResponse::error(
                ErrorCode::UnpaidFeesLock,
                UnpaidLockResponse {
                    has_unpaid: true,
                    balance: situation.balance,
                },
                "Access to results is locked until outstanding fees are paid",
            ),
        )),
        Ok(_) => Ok(()),
        Err(e) => Err(read_error(&e)),
    }
}

pub(crate) async fn situation_response(
    storage: &dyn Storage,
    student: &StudentProfile,
) -> HttpResponse {
    let today = chrono::Local::now().date_naive();
    match compute_situation(storage, student, today).await {
        Ok(situation) => HttpResponse::Ok().json(ApiResponse::success(
            situation,
            "Financial situation retrieved successfully",
        )),
        Err(e) => read_error(&e),
    }
}

pub async fn student_situation(
    service: &FinanceService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let student = match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(read_error(&e)),
    };
    if let Err(resp) = ensure_can_view_student(storage.as_ref(), &user, &student).await {
        return Ok(resp);
    }

    Ok(situation_response(storage.as_ref(), &student).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::finance::entities::InstallmentStatus;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn installment(total: f64, paid: f64, due: Option<&str>) -> Installment {
        let now = chrono::Utc::now();
        Installment {
            id: 1,
            student_id: 1,
            fee_type_id: 1,
            total_amount: total,
            paid_amount: paid,
            due_date: due.map(date),
            status: InstallmentStatus::from_amounts(paid, total),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_no_lock_when_fully_paid() {
        let today = date("2025-03-01");
        assert!(!is_locked(1000.0, 1000.0, None, today, 30));
        assert!(!is_locked(0.0, 0.0, None, today, 30));
    }

    #[test]
    fn test_lock_without_any_payment() {
        assert!(is_locked(1000.0, 0.0, None, date("2025-03-01"), 30));
    }

    #[test]
    fn test_lock_depends_on_last_payment_age() {
        let today = date("2025-03-31");
        assert!(!is_locked(1000.0, 400.0, Some(date("2025-03-10")), today, 30));
        assert!(!is_locked(1000.0, 400.0, Some(date("2025-03-01")), today, 30));
        assert!(is_locked(1000.0, 400.0, Some(date("2025-02-27")), today, 30));
    }

    #[test]
    fn test_late_penalty_only_counts_overdue_plans() {
        let today = date("2025-03-15");
        let plans = vec![
            installment(1000.0, 400.0, Some("2025-03-01")),
            installment(500.0, 0.0, Some("2025-04-01")),
            installment(300.0, 0.0, None),
            installment(200.0, 200.0, Some("2025-01-01")),
        ];
        assert_eq!(late_penalty(&plans, today, 5.0), 30.0);
        assert_eq!(late_penalty(&plans, today, 0.0), 0.0);
    }
}
