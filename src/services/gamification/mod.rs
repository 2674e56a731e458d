//! 游戏化：学生积分与徽章、排行榜、月度挑战

pub mod rules;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Duration;
use std::sync::Arc;

use crate::errors::{CampusError, Result};
use crate::models::gamification::responses::{
    LeaderboardEntry, LeaderboardKind, LeaderboardParams, LeaderboardResponse, PointsResponse,
};
use crate::models::grades::entities::ANNUAL_PERIOD;
use crate::models::users::entities::{StudentProfile, UserRole};
use crate::models::{ApiResponse, ErrorCode, ItemsResponse};
use crate::services::academics::dashboard::month_start;
use crate::services::finance::situation::compute_situation;
use crate::services::grades::rules::general_average;
use crate::services::students::current_student;
use crate::services::{current_user, forbidden, read_error};
use crate::storage::Storage;

const LEADERBOARD_SIZE: usize = 20;
/// 缺勤统计窗口
const RECENT_DAYS: i64 = 30;

pub struct GamificationService {
    storage: Option<Arc<dyn Storage>>,
}

impl GamificationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn points(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let student = match student_only(storage.as_ref(), request).await {
            Ok(student) => student,
            Err(resp) => return Ok(resp),
        };

        match student_facts(storage.as_ref(), &student).await {
            Ok(facts) => {
                let points = rules::points(&facts);
                let (level, points_to_next_level) = rules::level(points);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    PointsResponse {
                        student_id: student.id,
                        points,
                        level,
                        points_to_next_level,
                        badges: rules::badges(&facts),
                    },
                    "Points retrieved successfully",
                )))
            }
            Err(e) => Ok(read_error(&e)),
        }
    }

    pub async fn leaderboard(
        &self,
        request: &HttpRequest,
        params: LeaderboardParams,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let kind = params.kind.unwrap_or_default();

        match build_leaderboard(storage.as_ref(), kind).await {
            Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                LeaderboardResponse { kind, items },
                "Leaderboard retrieved successfully",
            ))),
            Err(e) => Ok(read_error(&e)),
        }
    }

    pub async fn challenges(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let student = match student_only(storage.as_ref(), request).await {
            Ok(student) => student,
            Err(resp) => return Ok(resp),
        };

        let since = month_start(chrono::Local::now().date_naive());
        let progress = async {
            let good = storage
                .list_validated_grades(student.id, None, None)
                .await?
                .iter()
                .filter(|g| g.value >= rules::GOOD_GRADE && g.graded_on >= since)
                .count() as u64;
            let absences = storage
                .count_student_absences_since(student.id, since)
                .await?;
            Ok::<_, CampusError>((good, absences))
        };

        match progress.await {
            Ok((good, absences)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                ItemsResponse::new(rules::challenges(good, absences)),
                "Challenges retrieved successfully",
            ))),
            Err(e) => Ok(read_error(&e)),
        }
    }
}

/// 积分和挑战只对学生开放
async fn student_only(
    storage: &dyn Storage,
    request: &HttpRequest,
) -> std::result::Result<StudentProfile, HttpResponse> {
    let user = current_user(request)?;
    if user.role != UserRole::Student {
        return Err(forbidden(
            ErrorCode::Forbidden,
            "Only students take part in gamification",
        ));
    }
    current_student(storage, request).await.map(|(_, student)| student)
}

async fn student_facts(storage: &dyn Storage, student: &StudentProfile) -> Result<rules::StudentFacts> {
    let today = chrono::Local::now().date_naive();

    let good_grades = storage
        .list_validated_grades(student.id, None, None)
        .await?
        .iter()
        .filter(|g| g.value >= rules::GOOD_GRADE)
        .count() as u64;
    let recent_absences = storage
        .count_student_absences_since(student.id, today - Duration::days(RECENT_DAYS))
        .await?;
    let situation = compute_situation(storage, student, today).await?;
    let averages = storage
        .list_student_averages(student.id, ANNUAL_PERIOD)
        .await?;

    Ok(rules::StudentFacts {
        good_grades,
        recent_absences,
        balance: situation.balance,
        annual_average: general_average(&averages),
    })
}

async fn build_leaderboard(
    storage: &dyn Storage,
    kind: LeaderboardKind,
) -> Result<Vec<LeaderboardEntry>> {
    if kind == LeaderboardKind::Grades {
        let mut scored = Vec::new();
        for ranking in storage
            .list_top_rankings(ANNUAL_PERIOD, LEADERBOARD_SIZE as u64)
            .await?
        {
            if let Some(student) = storage.get_student_summary(ranking.student_id).await? {
                let name = format!("{} {}", student.first_name, student.last_name);
                scored.push((student.student_id, name, ranking.general_average));
            }
        }
        return Ok(rules::rank_entries(scored, true, LEADERBOARD_SIZE));
    }

    let students = storage.list_student_summaries(None).await?;
    let (counts, descending, factor) = match kind {
        LeaderboardKind::Attendance => {
            let since = chrono::Local::now().date_naive() - Duration::days(RECENT_DAYS);
            (storage.count_absences_per_student(since).await?, false, 1.0)
        }
        _ => (
            storage
                .count_good_grades_per_student(rules::GOOD_GRADE)
                .await?,
            true,
            rules::POINTS_PER_GOOD_GRADE as f64,
        ),
    };

    let scored = students
        .into_iter()
        .map(|s| {
            let count = counts.get(&s.student_id).copied().unwrap_or(0);
            let name = format!("{} {}", s.first_name, s.last_name);
            (s.student_id, name, count as f64 * factor)
        })
        .collect();
    Ok(rules::rank_entries(scored, descending, LEADERBOARD_SIZE))
}
