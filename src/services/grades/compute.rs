//! 成绩验证后的平均分与排名重算

use std::collections::BTreeMap;

use crate::errors::{CampusError, Result};
use crate::models::grades::entities::{ANNUAL_PERIOD, Grade, SubjectAverage};
use crate::storage::Storage;

use super::rules;

/// 重算学生在该科目（该班）的年度平均分，返回新的平均分
pub async fn recompute_subject_average(
    storage: &dyn Storage,
    grade: &Grade,
) -> Result<Option<SubjectAverage>> {
    let grades = storage
        .list_validated_grades(grade.student_id, Some(grade.subject_id), Some(grade.class_id))
        .await?;

    let Some(value) = rules::grade_average(&grades) else {
        return Ok(None);
    };

    let subject = storage
        .get_subject(grade.subject_id)
        .await?
        .ok_or_else(|| CampusError::not_found(format!("科目不存在: {}", grade.subject_id)))?;
    let academic_year_id = storage
        .get_class(grade.class_id)
        .await?
        .map(|c| c.class.academic_year_id);

    let average = SubjectAverage {
        student_id: grade.student_id,
        subject_id: grade.subject_id,
        class_id: grade.class_id,
        subject_label: subject.label,
        coefficient: subject.coefficient,
        value,
        period: ANNUAL_PERIOD.to_string(),
    };
    storage
        .upsert_average(average.clone(), academic_year_id)
        .await?;
    Ok(Some(average))
}

/// 按各科年度平均分重排整个班级
pub async fn recompute_class_ranking(storage: &dyn Storage, class_id: i64) -> Result<usize> {
    let averages = storage.list_class_averages(class_id, ANNUAL_PERIOD).await?;

    let mut by_student: BTreeMap<i64, Vec<SubjectAverage>> = BTreeMap::new();
    for average in averages {
        by_student
            .entry(average.student_id)
            .or_default()
            .push(average);
    }

    let scores: Vec<(i64, f64)> = by_student
        .iter()
        .filter_map(|(student_id, items)| {
            rules::general_average(items).map(|avg| (*student_id, avg))
        })
        .collect();

    let rankings = rules::competition_ranking(class_id, ANNUAL_PERIOD, scores);
    let count = rankings.len();

    let academic_year_id = storage
        .get_class(class_id)
        .await?
        .map(|c| c.class.academic_year_id);
    storage
        .save_class_rankings(class_id, ANNUAL_PERIOD, academic_year_id, rankings)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CampusError;
    use crate::models::grades::requests::CreateGradeRequest;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::fixtures;
    use chrono::NaiveDate;

    fn grade_request(student_id: i64, subject_id: i64, class_id: i64, value: f64) -> CreateGradeRequest {
        CreateGradeRequest {
            student_id,
            subject_id,
            class_id,
            grade_type: "devoir".into(),
            value,
            coefficient: None,
            graded_on: None,
            comment: None,
        }
    }

    #[actix_web::test]
    async fn test_validated_grades_feed_averages_and_ranking() {
        let storage = fixtures::memory_storage().await;
        let school = fixtures::school(&storage).await;
        let class_id = fixtures::class(&storage, &school, "G1", 30).await;
        let math = fixtures::subject(&storage, "MATH", 2.0).await;
        let alice = fixtures::student(&storage, "alice", Some(class_id), Some(school.year_id)).await;
        let bruno = fixtures::student(&storage, "bruno", Some(class_id), Some(school.year_id)).await;
        let teacher = fixtures::user(&storage, "prof", UserRole::Teacher).await;
        let graded_on = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap();

        for (student_id, value) in [(alice.id, 16.0), (alice.id, 12.0), (bruno.id, 11.0)] {
            let grade = storage
                .create_grade_impl(teacher.id, grade_request(student_id, math, class_id, value), graded_on)
                .await
                .unwrap();
            let validated = storage.validate_grade_impl(grade.id).await.unwrap().unwrap();
            assert!(validated.is_validated);
            recompute_subject_average(&storage, &validated).await.unwrap();
        }

        // 未验证的成绩不计入平均分
        storage
            .create_grade_impl(teacher.id, grade_request(bruno.id, math, class_id, 20.0), graded_on)
            .await
            .unwrap();

        assert_eq!(recompute_class_ranking(&storage, class_id).await.unwrap(), 2);

        let averages = storage
            .list_student_averages_impl(alice.id, ANNUAL_PERIOD)
            .await
            .unwrap();
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].value, 14.0);
        assert_eq!(averages[0].coefficient, 2.0);

        let first = storage
            .get_student_ranking_impl(alice.id, ANNUAL_PERIOD)
            .await
            .unwrap()
            .unwrap();
        let second = storage
            .get_student_ranking_impl(bruno.id, ANNUAL_PERIOD)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.rank, 1);
        assert_eq!(second.rank, 2);
        assert_eq!(second.general_average, 11.0);
    }

    #[actix_web::test]
    async fn test_grade_is_validated_once() {
        let storage = fixtures::memory_storage().await;
        let school = fixtures::school(&storage).await;
        let class_id = fixtures::class(&storage, &school, "G1", 30).await;
        let math = fixtures::subject(&storage, "MATH", 1.0).await;
        let alice = fixtures::student(&storage, "alice", Some(class_id), Some(school.year_id)).await;
        let graded_on = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap();

        let grade = storage
            .create_grade_impl(1, grade_request(alice.id, math, class_id, 15.0), graded_on)
            .await
            .unwrap();
        storage.validate_grade_impl(grade.id).await.unwrap();

        let again = storage.validate_grade_impl(grade.id).await;
        assert!(matches!(again, Err(CampusError::Conflict(_))));
    }
}
