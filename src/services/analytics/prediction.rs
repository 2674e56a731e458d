//! 入学人数预测
//!
//! 取最近几个自然年中有入学记录的年份，预测值 = 均值 + (最近一年 - 最早一年) / 年数。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{Datelike, NaiveDate, NaiveTime};

use super::AnalyticsService;
use crate::errors::Result;
use crate::models::analytics::responses::{EnrollmentPrediction, TrendDirection, YearEnrollment};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, read_error};
use crate::storage::Storage;

/// 回看的自然年数（含当年）
const HISTORY_YEARS: i32 = 5;

fn year_start_ts(year: i32) -> i64 {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
        .and_utc()
        .timestamp()
}

/// `history` 按年份倒序；少于两年时无法预测
pub(crate) fn predict_enrollments(history: Vec<YearEnrollment>) -> Option<EnrollmentPrediction> {
    if history.len() < 2 {
        return None;
    }

    let years = history.len() as f64;
    let counts: Vec<f64> = history.iter().map(|h| h.enrollments as f64).collect();
    let mean = counts.iter().sum::<f64>() / years;
    let growth = (counts[0] - counts[counts.len() - 1]) / years;

    let trend = if growth > 0.0 {
        TrendDirection::Growth
    } else if growth < 0.0 {
        TrendDirection::Decline
    } else {
        TrendDirection::Stable
    };

    Some(EnrollmentPrediction {
        predicted_year: history[0].year + 1,
        predicted_enrollments: (mean + growth).max(0.0) as i64,
        trend,
        history,
    })
}

async fn enrollment_history(storage: &dyn Storage, current_year: i32) -> Result<Vec<YearEnrollment>> {
    let mut history = Vec::with_capacity(HISTORY_YEARS as usize);
    for year in (current_year - HISTORY_YEARS + 1..=current_year).rev() {
        let enrollments = storage
            .count_enrollments_between(year_start_ts(year), year_start_ts(year + 1))
            .await? as i64;
        if enrollments > 0 {
            history.push(YearEnrollment { year, enrollments });
        }
    }
    Ok(history)
}

pub async fn enrollment_prediction(
    service: &AnalyticsService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let current_year = chrono::Local::now().year();

    let history = match enrollment_history(storage.as_ref(), current_year).await {
        Ok(history) => history,
        Err(e) => return Ok(read_error(&e)),
    };

    match predict_enrollments(history) {
        Some(prediction) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            prediction,
            "Enrollment prediction computed successfully",
        ))),
        None => Ok(bad_request(
            ErrorCode::InsufficientData,
            "At least two years of enrollments are needed for a prediction",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year(year: i32, enrollments: i64) -> YearEnrollment {
        YearEnrollment { year, enrollments }
    }

    #[test]
    fn test_growing_enrollments() {
        let prediction =
            predict_enrollments(vec![year(2026, 120), year(2025, 100), year(2024, 80)]).unwrap();
        // 均值 100，增长 (120 - 80) / 3
        assert_eq!(prediction.predicted_year, 2027);
        assert_eq!(prediction.predicted_enrollments, 113);
        assert_eq!(prediction.trend, TrendDirection::Growth);
        assert_eq!(prediction.history.len(), 3);
    }

    #[test]
    fn test_declining_and_stable_enrollments() {
        let declining = predict_enrollments(vec![year(2026, 40), year(2025, 60)]).unwrap();
        assert_eq!(declining.predicted_enrollments, 40);
        assert_eq!(declining.trend, TrendDirection::Decline);

        let stable = predict_enrollments(vec![year(2026, 30), year(2024, 30)]).unwrap();
        assert_eq!(stable.predicted_enrollments, 30);
        assert_eq!(stable.trend, TrendDirection::Stable);
    }

    #[test]
    fn test_single_year_is_not_enough() {
        assert!(predict_enrollments(vec![year(2026, 10)]).is_none());
        assert!(predict_enrollments(Vec::new()).is_none());
    }

    #[test]
    fn test_year_bounds_are_utc_midnight() {
        assert_eq!(year_start_ts(1970), 0);
        assert_eq!(year_start_ts(2025) - year_start_ts(2024), 366 * 86_400);
    }
}
