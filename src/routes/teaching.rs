use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::academics::requests::ClassFilterParams;
use crate::models::grades::requests::{
    CreateAbsenceRequest, CreateGradeRequest, GradeListParams, JustifyAbsenceRequest,
    UpdateGradeRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::TeachingService;
use crate::utils::SafeIDI64;

// 懒加载的全局 TeachingService 实例
static TEACHING_SERVICE: Lazy<TeachingService> = Lazy::new(TeachingService::new_lazy);

pub async fn list_classes(req: HttpRequest) -> ActixResult<HttpResponse> {
    TEACHING_SERVICE.list_classes(&req).await
}

pub async fn list_subjects(
    req: HttpRequest,
    query: web::Query<ClassFilterParams>,
) -> ActixResult<HttpResponse> {
    TEACHING_SERVICE
        .list_subjects(&req, query.into_inner().class_id)
        .await
}

pub async fn list_class_students(req: HttpRequest, class_id: SafeIDI64) -> ActixResult<HttpResponse> {
    TEACHING_SERVICE.list_class_students(&req, class_id.0).await
}

pub async fn create_grade(
    req: HttpRequest,
    data: web::Json<CreateGradeRequest>,
) -> ActixResult<HttpResponse> {
    TEACHING_SERVICE.create_grade(&req, data.into_inner()).await
}

pub async fn update_grade(
    req: HttpRequest,
    grade_id: SafeIDI64,
    data: web::Json<UpdateGradeRequest>,
) -> ActixResult<HttpResponse> {
    TEACHING_SERVICE
        .update_grade(&req, grade_id.0, data.into_inner())
        .await
}

pub async fn validate_grade(req: HttpRequest, grade_id: SafeIDI64) -> ActixResult<HttpResponse> {
    TEACHING_SERVICE.validate_grade(&req, grade_id.0).await
}

pub async fn grade_history(req: HttpRequest, grade_id: SafeIDI64) -> ActixResult<HttpResponse> {
    TEACHING_SERVICE.grade_history(&req, grade_id.0).await
}

pub async fn student_grades(
    req: HttpRequest,
    student_id: SafeIDI64,
    query: web::Query<GradeListParams>,
) -> ActixResult<HttpResponse> {
    TEACHING_SERVICE
        .student_grades(&req, student_id.0, query.into_inner())
        .await
}

pub async fn create_absence(
    req: HttpRequest,
    data: web::Json<CreateAbsenceRequest>,
) -> ActixResult<HttpResponse> {
    TEACHING_SERVICE.create_absence(&req, data.into_inner()).await
}

pub async fn justify_absence(
    req: HttpRequest,
    absence_id: SafeIDI64,
    data: web::Json<JustifyAbsenceRequest>,
) -> ActixResult<HttpResponse> {
    TEACHING_SERVICE
        .justify_absence(&req, absence_id.0, data.into_inner())
        .await
}

// 配置路由
pub fn configure_teaching_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/teacher")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route("/classes", web::get().to(list_classes))
                    .route("/classes/{id}/students", web::get().to(list_class_students))
                    .route("/subjects", web::get().to(list_subjects))
                    .route("/grades", web::post().to(create_grade))
                    .route("/grades/{id}", web::put().to(update_grade))
                    .route("/grades/{id}/validate", web::post().to(validate_grade))
                    .route("/grades/{id}/history", web::get().to(grade_history))
                    .route("/students/{id}/grades", web::get().to(student_grades))
                    .route("/absences", web::post().to(create_absence))
                    .route("/absences/{id}/justify", web::put().to(justify_absence)),
            ),
    );
}
