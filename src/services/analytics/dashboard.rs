use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{Duration, NaiveDate, NaiveTime};

use super::AnalyticsService;
use crate::errors::Result;
use crate::models::analytics::responses::{AnalyticsDashboard, TopStudent, TrendPoint};
use crate::models::grades::entities::ANNUAL_PERIOD;
use crate::models::ApiResponse;
use crate::services::grades::rules::pass_rate;
use crate::services::read_error;
use crate::services::system::DynamicConfig;
use crate::storage::Storage;
use crate::utils::round2;

const TREND_BUCKETS: i64 = 6;
const BUCKET_DAYS: i64 = 30;
const TOP_STUDENTS: u64 = 10;

/// 从今天往前切出 6 个 30 天区间 [start, end)，最早的在前
pub(crate) fn trend_windows(today: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
    let end = today + Duration::days(1);
    (0..TREND_BUCKETS)
        .rev()
        .map(|i| {
            let bucket_end = end - Duration::days(BUCKET_DAYS * i);
            (bucket_end - Duration::days(BUCKET_DAYS), bucket_end)
        })
        .collect()
}

fn day_start_ts(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

async fn build_trends(storage: &dyn Storage, today: NaiveDate) -> Result<Vec<TrendPoint>> {
    let mut trends = Vec::with_capacity(TREND_BUCKETS as usize);
    for (start, end) in trend_windows(today) {
        let enrollments = storage
            .count_enrollments_between(day_start_ts(start), day_start_ts(end))
            .await?;
        // 缴费日期按天存储，区间右端取前一天
        let last_day = end - Duration::days(1);
        let (revenue, _) = storage
            .sum_validated_payments(Some(start), Some(last_day))
            .await?;
        trends.push(TrendPoint {
            period_start: start,
            period_end: last_day,
            enrollments: enrollments as i64,
            revenue: round2(revenue),
        });
    }
    Ok(trends)
}

async fn build_top_students(storage: &dyn Storage) -> Result<Vec<TopStudent>> {
    let rankings = storage.list_top_rankings(ANNUAL_PERIOD, TOP_STUDENTS).await?;
    let mut top = Vec::with_capacity(rankings.len());
    for ranking in rankings {
        if let Some(student) = storage.get_student_summary(ranking.student_id).await? {
            top.push(TopStudent {
                student_id: student.student_id,
                student_number: student.student_number,
                full_name: format!("{} {}", student.first_name, student.last_name),
                general_average: ranking.general_average,
            });
        }
    }
    Ok(top)
}

async fn build_dashboard(storage: &dyn Storage) -> Result<AnalyticsDashboard> {
    let today = chrono::Local::now().date_naive();
    let threshold = DynamicConfig::pass_threshold().await;

    let passed = storage.count_averages(ANNUAL_PERIOD, Some(threshold)).await?;
    let total = storage.count_averages(ANNUAL_PERIOD, None).await?;
    let (total_revenue, _) = storage.sum_validated_payments(None, None).await?;

    Ok(AnalyticsDashboard {
        total_students: storage.count_active_students().await? as i64,
        total_teachers: storage.count_active_teachers().await? as i64,
        total_classes: storage.count_active_classes().await? as i64,
        pass_rate: pass_rate(passed, total),
        total_revenue: round2(total_revenue),
        trends: build_trends(storage, today).await?,
        students_per_program: storage.students_per_program().await?,
        top_students: build_top_students(storage).await?,
    })
}

pub async fn dashboard(
    service: &AnalyticsService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match build_dashboard(storage.as_ref()).await {
        Ok(dashboard) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            dashboard,
            "Analytics dashboard retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_windows_are_contiguous() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let windows = trend_windows(today);
        assert_eq!(windows.len(), 6);
        assert_eq!(windows[5].1, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        for pair in windows.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        for (start, end) in &windows {
            assert_eq!((*end - *start).num_days(), 30);
        }
    }
}
