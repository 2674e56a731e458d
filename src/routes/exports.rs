use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, middleware, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::exports::requests::{
    GradeExportParams, PaymentExportParams, StudentExportParams,
};
use crate::models::users::entities::UserRole;
use crate::services::ExportService;

// 懒加载的全局 ExportService 实例
static EXPORT_SERVICE: Lazy<ExportService> = Lazy::new(ExportService::new_lazy);

pub async fn export_students(
    req: HttpRequest,
    query: web::Query<StudentExportParams>,
) -> ActixResult<HttpResponse> {
    EXPORT_SERVICE.students(&req, query.into_inner()).await
}

pub async fn export_grades(
    req: HttpRequest,
    query: web::Query<GradeExportParams>,
) -> ActixResult<HttpResponse> {
    EXPORT_SERVICE.grades(&req, query.into_inner()).await
}

pub async fn export_payments(
    req: HttpRequest,
    query: web::Query<PaymentExportParams>,
) -> ActixResult<HttpResponse> {
    EXPORT_SERVICE.payments(&req, query.into_inner()).await
}

pub async fn export_history(req: HttpRequest) -> ActixResult<HttpResponse> {
    EXPORT_SERVICE.history(&req).await
}

// 配置路由
pub fn configure_export_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/exports")
            .wrap(middleware::Compress::default())
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(&[
                        &UserRole::Admin,
                        &UserRole::Accountant,
                    ]))
                    .route("/students", web::get().to(export_students))
                    .route("/grades", web::get().to(export_grades))
                    .route("/payments", web::get().to(export_payments))
                    .route("/history", web::get().to(export_history)),
            ),
    );
}
