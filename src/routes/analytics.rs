use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::AnalyticsService;
use crate::utils::SafeStudentIdI64;

// 懒加载的全局 AnalyticsService 实例
static ANALYTICS_SERVICE: Lazy<AnalyticsService> = Lazy::new(AnalyticsService::new_lazy);

pub async fn student_risk(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.student_risk(&req, student_id.0).await
}

pub async fn dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.dashboard(&req).await
}

pub async fn enrollment_prediction(req: HttpRequest) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.enrollment_prediction(&req).await
}

pub async fn student_pathways(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.student_pathways(&req, student_id.0).await
}

// 配置路由
pub fn configure_analytics_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/analytics")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/risk/{student_id}").route(
                    web::get()
                        .to(student_risk)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/dashboard").route(
                    web::get()
                        .to(dashboard)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/enrollment-prediction").route(
                    web::get()
                        .to(enrollment_prediction)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            // 访问范围在服务内按角色判断
            .service(web::resource("/pathways/{student_id}").route(web::get().to(student_pathways))),
    );
}
