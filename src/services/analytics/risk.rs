//! 学生风险评估
//!
//! 风险分为各因素权重之和，成功概率 = clamp(100 - 10 × 分数, 0, 100)。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Duration;

use super::AnalyticsService;
use crate::errors::Result;
use crate::models::analytics::responses::{AlertLevel, RiskFactor, RiskReport};
use crate::models::grades::entities::ANNUAL_PERIOD;
use crate::models::users::entities::StudentProfile;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::finance::situation::compute_situation;
use crate::services::grades::rules::general_average;
use crate::services::{not_found, read_error};
use crate::storage::Storage;
use crate::utils::round2;

/// 统计缺勤的回溯天数
const ABSENCE_WINDOW_DAYS: i64 = 30;
/// 成绩趋势看最近几次已验证成绩
const TREND_SAMPLE: usize = 5;

/// 风险评估的输入
#[derive(Debug, Clone, Default)]
pub struct RiskInput {
    pub general_average: Option<f64>,
    pub recent_absences: i64,
    pub balance: f64,
    /// 最近的已验证成绩，按日期倒序
    pub recent_grades: Vec<f64>,
}

fn factor(code: &str, description: String, weight: i32, recommendation: &str) -> RiskFactor {
    RiskFactor {
        code: code.to_string(),
        description,
        weight,
        recommendation: recommendation.to_string(),
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// 最近三次成绩的均值比更早两次低 2 分以上视为下滑，不足五次时不比较
pub(crate) fn grades_falling(recent_grades: &[f64]) -> bool {
    if recent_grades.len() < 3 {
        return false;
    }
    let recent = mean(&recent_grades[..3]);
    let older = if recent_grades.len() >= TREND_SAMPLE {
        mean(&recent_grades[3..TREND_SAMPLE])
    } else {
        recent
    };
    recent < older - 2.0
}

pub(crate) fn alert_level(score: i32) -> AlertLevel {
    if score >= 6 {
        AlertLevel::High
    } else if score >= 3 {
        AlertLevel::Medium
    } else {
        AlertLevel::Low
    }
}

/// 根据输入计算风险报告
pub fn assess(student_id: i64, input: &RiskInput) -> RiskReport {
    let mut factors = Vec::new();

    // 没有平均分时按 0 处理
    let average = input.general_average.unwrap_or(0.0);
    if average < 10.0 {
        factors.push(factor(
            "low_average",
            format!("General average {average:.2} is below 10"),
            3,
            "Academic support is recommended",
        ));
    } else if average < 12.0 {
        factors.push(factor(
            "low_average",
            format!("General average {average:.2} is below 12"),
            1,
            "Academic support is recommended",
        ));
    }

    if input.recent_absences > 5 {
        factors.push(factor(
            "frequent_absences",
            format!("{} absences in the last 30 days", input.recent_absences),
            2,
            "Attendance follow-up is needed",
        ));
    } else if input.recent_absences > 3 {
        factors.push(factor(
            "frequent_absences",
            format!("{} absences in the last 30 days", input.recent_absences),
            1,
            "Attendance follow-up is needed",
        ));
    }

    if input.balance > 0.0 {
        factors.push(factor(
            "unpaid_fees",
            format!("Outstanding balance of {:.2}", input.balance),
            2,
            "Settle the financial situation",
        ));
    }

    if grades_falling(&input.recent_grades) {
        factors.push(factor(
            "falling_grades",
            "Recent grades are trending down".to_string(),
            2,
            "A meeting with the student is recommended",
        ));
    }

    let score: i32 = factors.iter().map(|f| f.weight).sum();
    let recommendations = factors.iter().map(|f| f.recommendation.clone()).collect();

    RiskReport {
        student_id,
        general_average: input.general_average.map(round2),
        recent_absences: input.recent_absences,
        balance: round2(input.balance),
        score,
        success_probability: (100 - 10 * score).clamp(0, 100),
        alert_level: alert_level(score),
        recommendations,
        factors,
    }
}

async fn collect_input(storage: &dyn Storage, student: &StudentProfile) -> Result<RiskInput> {
    let today = chrono::Local::now().date_naive();

    let averages = storage
        .list_student_averages(student.id, ANNUAL_PERIOD)
        .await?;
    let recent_absences = storage
        .count_student_absences_since(student.id, today - Duration::days(ABSENCE_WINDOW_DAYS))
        .await?;
    let situation = compute_situation(storage, student, today).await?;
    let recent_grades = storage
        .list_validated_grades(student.id, None, None)
        .await?
        .into_iter()
        .take(TREND_SAMPLE)
        .map(|g| g.value)
        .collect();

    Ok(RiskInput {
        general_average: general_average(&averages),
        recent_absences: recent_absences as i64,
        balance: situation.balance,
        recent_grades,
    })
}

pub async fn student_risk(
    service: &AnalyticsService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let student = match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(read_error(&e)),
    };

    match collect_input(storage.as_ref(), &student).await {
        Ok(input) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assess(student.id, &input),
            "Risk assessment computed successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_student_has_no_factor() {
        let input = RiskInput {
            general_average: Some(14.5),
            recent_absences: 1,
            balance: 0.0,
            recent_grades: vec![15.0, 14.0, 16.0, 13.0, 14.0],
        };
        let report = assess(1, &input);
        assert!(report.factors.is_empty());
        assert_eq!(report.score, 0);
        assert_eq!(report.success_probability, 100);
        assert_eq!(report.alert_level, AlertLevel::Low);
    }

    #[test]
    fn test_all_factors_accumulate() {
        let input = RiskInput {
            general_average: Some(8.0),
            recent_absences: 6,
            balance: 50_000.0,
            recent_grades: vec![6.0, 7.0, 8.0, 14.0, 15.0],
        };
        let report = assess(1, &input);
        assert_eq!(report.score, 9);
        assert_eq!(report.success_probability, 10);
        assert_eq!(report.alert_level, AlertLevel::High);
        assert_eq!(report.recommendations.len(), 4);
    }

    #[test]
    fn test_moderate_weights() {
        let input = RiskInput {
            general_average: Some(11.0),
            recent_absences: 4,
            balance: 0.0,
            recent_grades: vec![],
        };
        let report = assess(1, &input);
        assert_eq!(report.score, 2);
        assert_eq!(report.alert_level, AlertLevel::Low);
    }

    #[test]
    fn test_missing_average_counts_as_low() {
        let report = assess(1, &RiskInput::default());
        assert_eq!(report.score, 3);
        assert_eq!(report.alert_level, AlertLevel::Medium);
        assert_eq!(report.general_average, None);
    }

    #[test]
    fn test_grades_falling() {
        assert!(!grades_falling(&[5.0, 5.0]));
        // 不足五次时与自身比较
        assert!(!grades_falling(&[5.0, 6.0, 7.0, 18.0]));
        assert!(grades_falling(&[10.0, 10.0, 10.0, 13.0, 13.0]));
        assert!(!grades_falling(&[10.0, 10.0, 10.0, 12.0, 12.0]));
    }

    #[test]
    fn test_maximum_score() {
        assert_eq!(alert_level(6), AlertLevel::High);
        assert_eq!(alert_level(3), AlertLevel::Medium);
        let input = RiskInput {
            general_average: Some(2.0),
            recent_absences: 10,
            balance: 1.0,
            recent_grades: vec![1.0, 1.0, 1.0, 19.0, 19.0],
        };
        assert_eq!(assess(1, &input).success_probability, 10);
    }
}
