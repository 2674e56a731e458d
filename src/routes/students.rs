use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::PaginationQuery;
use crate::models::communication::requests::NotificationListParams;
use crate::models::grades::requests::GradeListParams;
use crate::models::users::entities::UserRole;
use crate::services::{CommunicationService, StudentPortalService};
use crate::utils::SafeIDI64;

// 懒加载的全局 StudentPortalService 实例
static STUDENT_SERVICE: Lazy<StudentPortalService> = Lazy::new(StudentPortalService::new_lazy);
static COMMUNICATION_SERVICE: Lazy<CommunicationService> =
    Lazy::new(CommunicationService::new_lazy);

pub async fn profile(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.profile(&req).await
}

pub async fn timetable(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.timetable(&req).await
}

pub async fn grades(
    req: HttpRequest,
    query: web::Query<GradeListParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.grades(&req, query.into_inner()).await
}

pub async fn averages(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.averages(&req).await
}

pub async fn ranking(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.ranking(&req).await
}

pub async fn report_card(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.report_card(&req).await
}

pub async fn decisions(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.decisions(&req).await
}

pub async fn absences(
    req: HttpRequest,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.absences(&req, query.into_inner()).await
}

pub async fn finance(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.finance(&req).await
}

// 通知与公共模块共用同一套逻辑
pub async fn notifications(
    req: HttpRequest,
    query: web::Query<NotificationListParams>,
) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE
        .list_notifications(&req, query.into_inner())
        .await
}

pub async fn mark_notification_read(
    req: HttpRequest,
    notification_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE
        .mark_notification_read(&req, notification_id.0)
        .await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/student")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles()))
                    .route("/profile", web::get().to(profile))
                    .route("/timetable", web::get().to(timetable))
                    .route("/grades", web::get().to(grades))
                    .route("/averages", web::get().to(averages))
                    .route("/ranking", web::get().to(ranking))
                    .route("/report-card", web::get().to(report_card))
                    .route("/decisions", web::get().to(decisions))
                    .route("/absences", web::get().to(absences))
                    .route("/finance", web::get().to(finance))
                    .route("/notifications", web::get().to(notifications))
                    .route(
                        "/notifications/{id}/read",
                        web::post().to(mark_notification_read),
                    ),
            ),
    );
}
