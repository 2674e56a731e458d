use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::gamification::responses::LeaderboardParams;
use crate::services::GamificationService;

// 懒加载的全局 GamificationService 实例
static GAMIFICATION_SERVICE: Lazy<GamificationService> =
    Lazy::new(GamificationService::new_lazy);

pub async fn points(req: HttpRequest) -> ActixResult<HttpResponse> {
    GAMIFICATION_SERVICE.points(&req).await
}

pub async fn leaderboard(
    req: HttpRequest,
    query: web::Query<LeaderboardParams>,
) -> ActixResult<HttpResponse> {
    GAMIFICATION_SERVICE
        .leaderboard(&req, query.into_inner())
        .await
}

pub async fn challenges(req: HttpRequest) -> ActixResult<HttpResponse> {
    GAMIFICATION_SERVICE.challenges(&req).await
}

// 配置路由
pub fn configure_gamification_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/gamification")
            .wrap(middlewares::RequireJWT)
            .route("/points", web::get().to(points))
            .route("/leaderboard", web::get().to(leaderboard))
            .route("/challenges", web::get().to(challenges)),
    );
}
