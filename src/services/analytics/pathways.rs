//! 基于优势科目的方向建议
//!
//! 年度平均分不低于 14 的科目算作优势科目，按科目名称中的关键词匹配方向。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::BTreeMap;

use super::AnalyticsService;
use crate::models::analytics::responses::{PathwayRecommendation, PathwayReport, StrongSubject};
use crate::models::grades::entities::{ANNUAL_PERIOD, SubjectAverage};
use crate::models::users::entities::{StudentProfile, User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, forbidden, not_found, read_error};
use crate::storage::Storage;
use crate::utils::round2;

const STRONG_SUBJECT_THRESHOLD: f64 = 14.0;

struct PathwayRule {
    pathway: &'static str,
    keywords: &'static [&'static str],
    reason: &'static str,
}

const PATHWAY_RULES: &[PathwayRule] = &[
    PathwayRule {
        pathway: "Informatique",
        keywords: &["math", "informatique", "computer"],
        reason: "Strong results in mathematics or computer science",
    },
    PathwayRule {
        pathway: "Gestion",
        keywords: &["commerce", "gestion", "management", "économie", "economi"],
        reason: "Strong results in business or management",
    },
];

/// 同一科目在不同班级的年度平均分取均值，按平均分降序
pub(crate) fn subject_means(averages: &[SubjectAverage]) -> Vec<StrongSubject> {
    let mut by_subject: BTreeMap<i64, (String, f64, usize)> = BTreeMap::new();
    for a in averages {
        let entry = by_subject
            .entry(a.subject_id)
            .or_insert_with(|| (a.subject_label.clone(), 0.0, 0));
        entry.1 += a.value;
        entry.2 += 1;
    }

    let mut subjects: Vec<StrongSubject> = by_subject
        .into_iter()
        .map(|(subject_id, (subject_label, sum, count))| StrongSubject {
            subject_id,
            subject_label,
            average: round2(sum / count as f64),
        })
        .collect();
    subjects.sort_by(|a, b| b.average.total_cmp(&a.average));
    subjects
}

/// 匹配到的优势科目里最高的平均分折算为 0-1 的分数
pub(crate) fn recommend(strong: &[StrongSubject]) -> Vec<PathwayRecommendation> {
    PATHWAY_RULES
        .iter()
        .filter_map(|rule| {
            strong
                .iter()
                .filter(|s| {
                    let label = s.subject_label.to_lowercase();
                    rule.keywords.iter().any(|k| label.contains(k))
                })
                .map(|s| s.average)
                .max_by(f64::total_cmp)
                .map(|best| PathwayRecommendation {
                    pathway: rule.pathway.to_string(),
                    score: round2(best / 20.0),
                    reason: rule.reason.to_string(),
                })
        })
        .collect()
}

/// 管理员和教师可查看任意学生；学生只能看自己，家长只能看关联的子女
async fn ensure_can_view(
    storage: &dyn Storage,
    user: &User,
    student: &StudentProfile,
) -> Result<(), HttpResponse> {
    let denied = || forbidden(ErrorCode::Forbidden, "You are not allowed to view this student");

    match user.role {
        UserRole::Admin | UserRole::Teacher => Ok(()),
        UserRole::Student if student.user_id == user.id => Ok(()),
        UserRole::Parent => match storage.get_parent_by_user_id(user.id).await {
            Ok(Some(parent)) => match storage.is_parent_of(parent.id, student.id).await {
                Ok(true) => Ok(()),
                Ok(false) => Err(denied()),
                Err(e) => Err(read_error(&e)),
            },
            Ok(None) => Err(denied()),
            Err(e) => Err(read_error(&e)),
        },
        _ => Err(denied()),
    }
}

pub async fn student_pathways(
    service: &AnalyticsService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let student = match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(read_error(&e)),
    };
    if let Err(resp) = ensure_can_view(storage.as_ref(), &user, &student).await {
        return Ok(resp);
    }

    let averages = match storage
        .list_student_averages(student.id, ANNUAL_PERIOD)
        .await
    {
        Ok(averages) => averages,
        Err(e) => return Ok(read_error(&e)),
    };
    if averages.is_empty() {
        return Ok(bad_request(
            ErrorCode::InsufficientData,
            "No validated results to base a recommendation on",
        ));
    }

    let strong_subjects: Vec<StrongSubject> = subject_means(&averages)
        .into_iter()
        .filter(|s| s.average >= STRONG_SUBJECT_THRESHOLD)
        .collect();
    let recommendations = recommend(&strong_subjects);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PathwayReport {
            student_id: student.id,
            strong_subjects,
            recommendations,
        },
        "Pathway recommendations computed successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::{HttpMessage, http::StatusCode, test};
    use std::sync::Arc;

    fn average(subject_id: i64, label: &str, value: f64) -> SubjectAverage {
        SubjectAverage {
            student_id: 1,
            subject_id,
            class_id: 1,
            subject_label: label.into(),
            coefficient: 1.0,
            value,
            period: ANNUAL_PERIOD.into(),
        }
    }

    #[core::prelude::v1::test]
    fn test_subject_means_merge_classes() {
        let means = subject_means(&[
            average(1, "Mathématiques", 15.0),
            average(2, "Français", 11.0),
            average(1, "Mathématiques", 17.0),
        ]);
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].subject_id, 1);
        assert_eq!(means[0].average, 16.0);
        assert_eq!(means[1].average, 11.0);
    }

    #[core::prelude::v1::test]
    fn test_strong_maths_suggests_computing() {
        let strong = vec![StrongSubject {
            subject_id: 1,
            subject_label: "Mathématiques".into(),
            average: 16.0,
        }];
        let recommendations = recommend(&strong);
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].pathway, "Informatique");
        assert_eq!(recommendations[0].score, 0.8);
    }

    #[core::prelude::v1::test]
    fn test_unmatched_subjects_give_no_pathway() {
        let strong = vec![StrongSubject {
            subject_id: 4,
            subject_label: "Histoire".into(),
            average: 18.0,
        }];
        assert!(recommend(&strong).is_empty());
        assert!(recommend(&[]).is_empty());
    }

    #[actix_web::test]
    async fn test_students_only_see_their_own_pathways() {
        let storage = fixtures::memory_storage().await;
        let alice = fixtures::student(&storage, "alice", None, None).await;
        let bruno = fixtures::student(&storage, "bruno", None, None).await;
        let alice_user = storage
            .get_user_by_id_impl(alice.user_id)
            .await
            .unwrap()
            .unwrap();
        let admin = fixtures::user(&storage, "directeur", UserRole::Admin).await;

        let service = AnalyticsService {
            storage: Some(Arc::new(storage)),
        };

        let request = test::TestRequest::default().to_http_request();
        request.extensions_mut().insert(alice_user);
        let resp = student_pathways(&service, &request, bruno.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // 没有已验证成绩时无法给出建议
        let request = test::TestRequest::default().to_http_request();
        request.extensions_mut().insert(admin);
        let resp = student_pathways(&service, &request, bruno.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
