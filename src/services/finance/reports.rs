use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FinanceService;
use super::payments::parse_optional_date;
use crate::errors::Result;
use crate::models::finance::requests::DateRangeParams;
use crate::models::finance::responses::FinanceReport;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, read_error};
use crate::storage::Storage;
use crate::utils::round2;

async fn build_report(
    storage: &dyn Storage,
    date_from: Option<chrono::NaiveDate>,
    date_to: Option<chrono::NaiveDate>,
) -> Result<FinanceReport> {
    let by_method = storage
        .summarize_payments_by_method(date_from, date_to)
        .await?;
    // 总计与分组使用同一个日期过滤
    let (grand_total, payments_count) = storage.sum_validated_payments(date_from, date_to).await?;

    Ok(FinanceReport {
        date_from,
        date_to,
        by_method,
        grand_total: round2(grand_total),
        payments_count: payments_count as i64,
    })
}

/// 已验证缴费按方式汇总
pub async fn summary_report(
    service: &FinanceService,
    request: &HttpRequest,
    params: DateRangeParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let (date_from, date_to) = match (
        parse_optional_date(params.date_from.as_deref()),
        parse_optional_date(params.date_to.as_deref()),
    ) {
        (Ok(from), Ok(to)) => (from, to),
        (Err(msg), _) | (_, Err(msg)) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
    };
    if let (Some(from), Some(to)) = (date_from, date_to)
        && from > to
    {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "date_from must not be after date_to",
        ));
    }

    match build_report(storage.as_ref(), date_from, date_to).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            report,
            "Finance report generated successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}
