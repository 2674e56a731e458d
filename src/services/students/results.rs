//! 学生成绩相关视图，学生端和家长端共用
//!
//! 调用方负责欠费锁定检查。

use actix_web::HttpResponse;
use std::collections::BTreeMap;

use crate::errors::Result;
use crate::models::grades::entities::{ANNUAL_PERIOD, SubjectAverage};
use crate::models::grades::requests::{GradeListParams, GradeQuery};
use crate::models::grades::responses::{
    AcademicDecision, AveragesResponse, RankingResponse, ReportCard, ReportCardLine,
};
use crate::models::users::entities::StudentProfile;
use crate::models::{ApiResponse, ErrorCode, ItemsResponse, PaginationQuery};
use crate::services::grades::rules::{decision, general_average, weighted_general_average};
use crate::services::system::DynamicConfig;
use crate::services::{not_found, read_error};
use crate::storage::Storage;

/// 学生和家长默认只看到已验证的成绩
pub(crate) async fn grades_response(
    storage: &dyn Storage,
    student: &StudentProfile,
    params: GradeListParams,
) -> HttpResponse {
    let (page, size) = params.pagination.normalized();
    let query = GradeQuery {
        student_id: Some(student.id),
        class_id: None,
        subject_id: params.subject_id,
        validated_only: params.validated_only.unwrap_or(true),
        page,
        size,
    };

    match storage.list_grades(query).await {
        Ok(grades) => HttpResponse::Ok().json(ApiResponse::success(
            grades,
            "Grades retrieved successfully",
        )),
        Err(e) => read_error(&e),
    }
}

pub(crate) async fn averages_response(storage: &dyn Storage, student: &StudentProfile) -> HttpResponse {
    match storage.list_student_averages(student.id, ANNUAL_PERIOD).await {
        Ok(items) => {
            let general_average = general_average(&items);
            HttpResponse::Ok().json(ApiResponse::success(
                AveragesResponse {
                    items,
                    general_average,
                },
                "Averages retrieved successfully",
            ))
        }
        Err(e) => read_error(&e),
    }
}

async fn class_size(storage: &dyn Storage, student: &StudentProfile) -> Result<i64> {
    match student.class_id {
        Some(class_id) => Ok(storage.count_class_rankings(class_id, ANNUAL_PERIOD).await? as i64),
        None => Ok(0),
    }
}

async fn build_ranking(storage: &dyn Storage, student: &StudentProfile) -> Result<RankingResponse> {
    let ranking = storage.get_student_ranking(student.id, ANNUAL_PERIOD).await?;
    Ok(RankingResponse {
        rank: ranking.as_ref().map(|r| r.rank),
        general_average: ranking.as_ref().map(|r| r.general_average),
        total_students: class_size(storage, student).await?,
        period: ANNUAL_PERIOD.to_string(),
    })
}

pub(crate) async fn ranking_response(storage: &dyn Storage, student: &StudentProfile) -> HttpResponse {
    match build_ranking(storage, student).await {
        Ok(ranking) => HttpResponse::Ok().json(ApiResponse::success(
            ranking,
            "Ranking retrieved successfully",
        )),
        Err(e) => read_error(&e),
    }
}

fn report_lines(averages: &[SubjectAverage]) -> Vec<ReportCardLine> {
    averages
        .iter()
        .map(|a| ReportCardLine {
            subject_id: a.subject_id,
            subject_label: a.subject_label.clone(),
            coefficient: a.coefficient,
            average: a.value,
        })
        .collect()
}

async fn build_report_card(
    storage: &dyn Storage,
    student: &StudentProfile,
) -> Result<Option<ReportCard>> {
    let Some(summary) = storage.get_student_summary(student.id).await? else {
        return Ok(None);
    };

    let academic_year = match student.academic_year_id {
        Some(year_id) => storage.get_academic_year(year_id).await?,
        None => None,
    };
    // 缺勤从学年开始计，没有学年时统计全部
    let absences_since = academic_year
        .as_ref()
        .map(|y| y.start_date)
        .unwrap_or_default();

    let averages = storage
        .list_student_averages(student.id, ANNUAL_PERIOD)
        .await?;
    let general_average = weighted_general_average(&averages);
    let pass_threshold = DynamicConfig::pass_threshold().await;
    let ranking = storage.get_student_ranking(student.id, ANNUAL_PERIOD).await?;

    Ok(Some(ReportCard {
        school_name: DynamicConfig::school_name().await,
        student: summary,
        academic_year_label: academic_year.map(|y| y.label),
        period: ANNUAL_PERIOD.to_string(),
        subjects: report_lines(&averages),
        general_average,
        rank: ranking.map(|r| r.rank),
        total_students: class_size(storage, student).await?,
        pass_threshold,
        decision: general_average.map(|avg| decision(avg, pass_threshold)),
        absences: storage
            .count_student_absences_since(student.id, absences_since)
            .await? as i64,
        generated_at: chrono::Utc::now(),
    }))
}

pub(crate) async fn report_card_response(
    storage: &dyn Storage,
    student: &StudentProfile,
) -> HttpResponse {
    match build_report_card(storage, student).await {
        Ok(Some(card)) => HttpResponse::Ok().json(ApiResponse::success(
            card,
            "Report card generated successfully",
        )),
        Ok(None) => not_found(ErrorCode::StudentNotFound, "Student not found"),
        Err(e) => read_error(&e),
    }
}

/// 按学年汇总年度平均分并给出结论，最近的学年在前
pub(crate) fn decisions_by_year(
    averages: Vec<(Option<i64>, SubjectAverage)>,
    pass_threshold: f64,
) -> Vec<AcademicDecision> {
    let mut by_year: BTreeMap<Option<i64>, Vec<SubjectAverage>> = BTreeMap::new();
    for (year, average) in averages {
        by_year.entry(year).or_default().push(average);
    }

    by_year
        .into_iter()
        .rev()
        .filter_map(|(year, items)| {
            weighted_general_average(&items).map(|avg| AcademicDecision {
                academic_year_id: year,
                academic_year_label: None,
                general_average: avg,
                pass_threshold,
                decision: decision(avg, pass_threshold),
                subjects: items.len(),
            })
        })
        .collect()
}

async fn build_decisions(
    storage: &dyn Storage,
    student: &StudentProfile,
) -> Result<Vec<AcademicDecision>> {
    let averages = storage
        .list_student_averages_by_year(student.id, ANNUAL_PERIOD)
        .await?;
    let pass_threshold = DynamicConfig::pass_threshold().await;

    let mut decisions = decisions_by_year(averages, pass_threshold);
    for item in decisions.iter_mut() {
        if let Some(year_id) = item.academic_year_id {
            item.academic_year_label = storage.get_academic_year(year_id).await?.map(|y| y.label);
        }
    }
    Ok(decisions)
}

pub(crate) async fn decisions_response(
    storage: &dyn Storage,
    student: &StudentProfile,
) -> HttpResponse {
    match build_decisions(storage, student).await {
        Ok(items) => HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(items),
            "Academic decisions retrieved successfully",
        )),
        Err(e) => read_error(&e),
    }
}

pub(crate) async fn absences_response(
    storage: &dyn Storage,
    student: &StudentProfile,
    pagination: PaginationQuery,
) -> HttpResponse {
    match storage.list_student_absences(student.id, pagination).await {
        Ok(absences) => HttpResponse::Ok().json(ApiResponse::success(
            absences,
            "Absences retrieved successfully",
        )),
        Err(e) => read_error(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grades::entities::Decision;

    #[test]
    fn test_report_lines_keep_subject_order() {
        let averages = vec![
            SubjectAverage {
                student_id: 1,
                subject_id: 3,
                class_id: 1,
                subject_label: "Mathematics".into(),
                coefficient: 4.0,
                value: 12.5,
                period: ANNUAL_PERIOD.into(),
            },
            SubjectAverage {
                student_id: 1,
                subject_id: 7,
                class_id: 1,
                subject_label: "French".into(),
                coefficient: 2.0,
                value: 9.0,
                period: ANNUAL_PERIOD.into(),
            },
        ];
        let lines = report_lines(&averages);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].subject_label, "Mathematics");
        assert_eq!(lines[1].average, 9.0);
        assert_eq!(lines[1].coefficient, 2.0);
    }

    fn average(subject_id: i64, coefficient: f64, value: f64) -> SubjectAverage {
        SubjectAverage {
            student_id: 1,
            subject_id,
            class_id: 1,
            subject_label: format!("Subject {subject_id}"),
            coefficient,
            value,
            period: ANNUAL_PERIOD.into(),
        }
    }

    #[test]
    fn test_decisions_are_per_year_newest_first() {
        let decisions = decisions_by_year(
            vec![
                (Some(1), average(1, 3.0, 8.0)),
                (Some(1), average(2, 1.0, 12.0)),
                (Some(2), average(1, 2.0, 14.0)),
                (Some(2), average(2, 2.0, 11.0)),
            ],
            10.0,
        );

        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].academic_year_id, Some(2));
        assert_eq!(decisions[0].general_average, 12.5);
        assert_eq!(decisions[0].decision, Decision::Admitted);
        assert_eq!(decisions[1].academic_year_id, Some(1));
        assert_eq!(decisions[1].general_average, 9.0);
        assert_eq!(decisions[1].decision, Decision::Failed);
        assert_eq!(decisions[1].subjects, 2);
    }

    #[test]
    fn test_no_averages_means_no_decision() {
        assert!(decisions_by_year(Vec::new(), 10.0).is_empty());
    }
}
