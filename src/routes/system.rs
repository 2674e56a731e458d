use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, middleware, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::system::requests::{SettingAuditParams, UpdateSettingRequest};
use crate::models::users::entities::UserRole;
use crate::services::SystemService;
use crate::utils::SafeSettingKey;

// 懒加载的全局 SystemService 实例
static SYSTEM_SERVICE: Lazy<SystemService> = Lazy::new(SystemService::new_lazy);

pub async fn list_settings(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.list_settings(&request).await
}

pub async fn update_setting(
    request: HttpRequest,
    key: SafeSettingKey,
    data: web::Json<UpdateSettingRequest>,
) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE
        .update_setting(&request, key.0, data.into_inner())
        .await
}

pub async fn list_setting_audits(
    request: HttpRequest,
    query: web::Query<SettingAuditParams>,
) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE
        .list_setting_audits(&request, query.into_inner())
        .await
}

// 配置路由
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/system")
            .wrap(middleware::Compress::default())
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("/settings", web::get().to(list_settings))
                    .route("/settings/audits", web::get().to(list_setting_audits))
                    .route("/settings/{key}", web::put().to(update_setting)),
            ),
    );
}
