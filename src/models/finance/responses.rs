use super::entities::{ClassFee, Installment, Payment, PaymentMethod, PaymentStatus};
use crate::models::common::PaginationInfo;
use crate::models::users::entities::StudentSummary;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct PaymentListResponse {
    pub items: Vec<Payment>,
    pub pagination: PaginationInfo,
}

/// 学生财务状况
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct FinancialSituation {
    pub student_id: i64,
    pub total_due: f64,
    pub total_paid: f64,
    pub balance: f64,
    pub has_unpaid: bool,
    pub locked: bool,
    pub last_payment_on: Option<chrono::NaiveDate>,
    /// 已逾期分期计划按罚金比例计算的滞纳金
    pub late_penalty: f64,
    pub fees: Vec<ClassFee>,
    pub payments: Vec<Payment>,
    pub installments: Vec<Installment>,
}

/// 缴费收据（JSON 形式）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct Receipt {
    pub receipt_number: String,
    pub school_name: String,
    pub paid_on: chrono::NaiveDate,
    pub student: StudentSummary,
    pub fee_type_label: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub issued_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct MethodSummary {
    pub method: String,
    pub total: f64,
    pub count: i64,
}

/// 财务汇总报表
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct FinanceReport {
    pub date_from: Option<chrono::NaiveDate>,
    pub date_to: Option<chrono::NaiveDate>,
    pub by_method: Vec<MethodSummary>,
    pub grand_total: f64,
    pub payments_count: i64,
}
