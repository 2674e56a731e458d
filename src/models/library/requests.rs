use super::entities::{FineStatus, LoanStatus};
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/library.ts")]
pub struct BookListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    /// 按书名、作者或 ISBN 搜索
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/library.ts")]
pub struct CreateBookRequest {
    pub isbn: Option<String>,
    pub title: String,
    pub author: String,
    pub publisher: Option<String>,
    pub published_year: Option<i32>,
    pub language: Option<String>,
    pub category: Option<String>,
    pub copies: i32,
    pub shelf_mark: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/library.ts")]
pub struct LoanListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<LoanStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub borrower_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/library.ts")]
pub struct CreateLoanRequest {
    pub copy_id: i64,
    pub borrower_id: i64,
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/library.ts")]
pub struct CreateReservationRequest {
    pub book_id: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/library.ts")]
pub struct FineListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<FineStatus>,
}
