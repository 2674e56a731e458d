use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{Datelike, NaiveDate};

use super::AcademicService;
use crate::errors::Result;
use crate::models::academics::responses::DashboardStats;
use crate::models::grades::entities::ANNUAL_PERIOD;
use crate::models::ApiResponse;
use crate::services::grades::rules::pass_rate;
use crate::services::read_error;
use crate::services::system::DynamicConfig;
use crate::storage::Storage;

/// 当月第一天
pub(crate) fn month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

async fn collect_stats(storage: &dyn Storage, today: NaiveDate) -> Result<DashboardStats> {
    let since = month_start(today);
    let threshold = DynamicConfig::pass_threshold().await;

    let passed = storage.count_averages(ANNUAL_PERIOD, Some(threshold)).await?;
    let total = storage.count_averages(ANNUAL_PERIOD, None).await?;
    let (payments_this_month, _) = storage
        .sum_validated_payments(Some(since), Some(today))
        .await?;

    Ok(DashboardStats {
        active_students: storage.count_active_students().await? as i64,
        active_teachers: storage.count_active_teachers().await? as i64,
        active_classes: storage.count_active_classes().await? as i64,
        pass_rate: pass_rate(passed, total),
        payments_this_month,
        absences_this_month: storage.count_absences_since(since).await? as i64,
    })
}

pub async fn dashboard_stats(
    service: &AcademicService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let today = chrono::Local::now().date_naive();

    match collect_stats(storage.as_ref(), today).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Dashboard statistics retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_start() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
        assert_eq!(month_start(today), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }
}
