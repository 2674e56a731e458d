use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::PaginationQuery;
use crate::models::grades::requests::GradeListParams;
use crate::models::users::entities::UserRole;
use crate::services::ParentPortalService;
use crate::utils::SafeStudentIdI64;

// 懒加载的全局 ParentPortalService 实例
static PARENT_SERVICE: Lazy<ParentPortalService> = Lazy::new(ParentPortalService::new_lazy);

pub async fn children(req: HttpRequest) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.children(&req).await
}

pub async fn child_grades(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    query: web::Query<GradeListParams>,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE
        .child_grades(&req, student_id.0, query.into_inner())
        .await
}

pub async fn child_averages(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.child_averages(&req, student_id.0).await
}

pub async fn child_report_card(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.child_report_card(&req, student_id.0).await
}

pub async fn child_absences(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE
        .child_absences(&req, student_id.0, query.into_inner())
        .await
}

pub async fn child_finance(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.child_finance(&req, student_id.0).await
}

// 配置路由
pub fn configure_parent_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/parent")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::parent_roles()))
                    .route("/children", web::get().to(children))
                    .service(
                        web::scope("/children/{student_id}")
                            .route("/grades", web::get().to(child_grades))
                            .route("/averages", web::get().to(child_averages))
                            .route("/report-card", web::get().to(child_report_card))
                            .route("/absences", web::get().to(child_absences))
                            .route("/finance", web::get().to(child_finance)),
                    ),
            ),
    );
}
