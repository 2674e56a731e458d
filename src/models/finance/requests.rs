use super::entities::{PaymentMethod, PaymentStatus};
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct CreateFeeTypeRequest {
    pub code: String,
    pub label: String,
    pub amount: f64,
    #[serde(default = "default_true")]
    pub is_mandatory: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct UpdateFeeTypeRequest {
    pub label: Option<String>,
    pub amount: Option<f64>,
    pub is_mandatory: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct ClassFeeListParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub academic_year_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct CreateClassFeeRequest {
    pub class_id: i64,
    pub fee_type_id: i64,
    pub amount: Option<f64>,
    pub academic_year_id: i64,
}

/// 缴费列表过滤
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct PaymentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
    pub status: Option<PaymentStatus>,
    pub method: Option<PaymentMethod>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// 存储层使用的缴费查询（日期已解析）
#[derive(Debug, Clone, Default)]
pub struct PaymentQuery {
    pub student_id: Option<i64>,
    pub status: Option<PaymentStatus>,
    pub method: Option<PaymentMethod>,
    pub date_from: Option<chrono::NaiveDate>,
    pub date_to: Option<chrono::NaiveDate>,
    pub page: u64,
    pub size: u64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct CreatePaymentRequest {
    pub student_id: i64,
    pub fee_type_id: i64,
    pub amount: f64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub paid_on: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct RejectPaymentRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct CreateInstallmentRequest {
    pub student_id: i64,
    pub fee_type_id: i64,
    pub total_amount: f64,
    pub due_date: Option<String>,
}

/// 日期区间
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct DateRangeParams {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}
