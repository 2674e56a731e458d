use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::academics::requests::{
    AssignSubjectRequest, ClassListParams, CreateAcademicYearRequest, CreateClassRequest,
    CreateLevelRequest, CreateProgramRequest, CreateSubjectRequest, CreateTimetableSlotRequest,
    UpdateAcademicYearRequest, UpdateClassRequest, UpdateLevelRequest, UpdateProgramRequest,
    UpdateSubjectRequest,
};
use crate::models::audit::requests::AuditLogParams;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{AssignClassRequest, LinkChildRequest};
use crate::services::AcademicService;
use crate::utils::{SafeIDI64, SafeStudentIdI64};

// 懒加载的全局 AcademicService 实例
static ACADEMIC_SERVICE: Lazy<AcademicService> = Lazy::new(AcademicService::new_lazy);

// 学年
pub async fn list_years(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_years(&req).await
}

pub async fn create_year(
    req: HttpRequest,
    data: web::Json<CreateAcademicYearRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.create_year(&req, data.into_inner()).await
}

pub async fn update_year(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateAcademicYearRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.update_year(&req, id.0, data.into_inner()).await
}

pub async fn activate_year(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.activate_year(&req, id.0).await
}

// 专业
pub async fn list_programs(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_programs(&req).await
}

pub async fn create_program(
    req: HttpRequest,
    data: web::Json<CreateProgramRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.create_program(&req, data.into_inner()).await
}

pub async fn update_program(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateProgramRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .update_program(&req, id.0, data.into_inner())
        .await
}

pub async fn delete_program(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.delete_program(&req, id.0).await
}

// 年级
pub async fn list_levels(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_levels(&req).await
}

pub async fn create_level(
    req: HttpRequest,
    data: web::Json<CreateLevelRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.create_level(&req, data.into_inner()).await
}

pub async fn update_level(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateLevelRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.update_level(&req, id.0, data.into_inner()).await
}

pub async fn delete_level(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.delete_level(&req, id.0).await
}

// 科目
pub async fn list_subjects(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_subjects(&req).await
}

pub async fn create_subject(
    req: HttpRequest,
    data: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.create_subject(&req, data.into_inner()).await
}

pub async fn update_subject(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .update_subject(&req, id.0, data.into_inner())
        .await
}

pub async fn delete_subject(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.delete_subject(&req, id.0).await
}

// 班级
pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassListParams>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_classes(&req, query.into_inner()).await
}

pub async fn create_class(
    req: HttpRequest,
    data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.create_class(&req, data.into_inner()).await
}

pub async fn get_class(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.get_class(&req, id.0).await
}

pub async fn update_class(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateClassRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.update_class(&req, id.0, data.into_inner()).await
}

pub async fn delete_class(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.delete_class(&req, id.0).await
}

// 班级科目与课表
pub async fn assign_subject(
    req: HttpRequest,
    data: web::Json<AssignSubjectRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.assign_subject(&req, data.into_inner()).await
}

pub async fn list_class_subjects(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_class_subjects(&req, id.0).await
}

pub async fn remove_class_subject(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.remove_class_subject(&req, id.0).await
}

pub async fn create_timetable_slot(
    req: HttpRequest,
    data: web::Json<CreateTimetableSlotRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .create_timetable_slot(&req, data.into_inner())
        .await
}

pub async fn list_class_timetable(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_class_timetable(&req, id.0).await
}

pub async fn delete_timetable_slot(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.delete_timetable_slot(&req, id.0).await
}

// 分班与家长关联
pub async fn assign_student_class(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<AssignClassRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .assign_student_class(&req, id.0, data.into_inner())
        .await
}

pub async fn link_child(
    req: HttpRequest,
    parent_id: SafeIDI64,
    data: web::Json<LinkChildRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .link_child(&req, parent_id.0, data.into_inner())
        .await
}

pub async fn unlink_child(
    req: HttpRequest,
    parent_id: SafeIDI64,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .unlink_child(&req, parent_id.0, student_id.0)
        .await
}

// 统计与审计
pub async fn dashboard_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.dashboard_stats(&req).await
}

pub async fn list_action_logs(
    req: HttpRequest,
    query: web::Query<AuditLogParams>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .list_action_logs(&req, query.into_inner())
        .await
}

pub async fn list_login_logs(
    req: HttpRequest,
    query: web::Query<AuditLogParams>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_login_logs(&req, query.into_inner()).await
}

// 配置路由
pub fn configure_academic_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("/academic-years", web::get().to(list_years))
                    .route("/academic-years", web::post().to(create_year))
                    .route("/academic-years/{id}", web::put().to(update_year))
                    .route(
                        "/academic-years/{id}/activate",
                        web::post().to(activate_year),
                    )
                    .route("/programs", web::get().to(list_programs))
                    .route("/programs", web::post().to(create_program))
                    .route("/programs/{id}", web::put().to(update_program))
                    .route("/programs/{id}", web::delete().to(delete_program))
                    .route("/levels", web::get().to(list_levels))
                    .route("/levels", web::post().to(create_level))
                    .route("/levels/{id}", web::put().to(update_level))
                    .route("/levels/{id}", web::delete().to(delete_level))
                    .route("/subjects", web::get().to(list_subjects))
                    .route("/subjects", web::post().to(create_subject))
                    .route("/subjects/{id}", web::put().to(update_subject))
                    .route("/subjects/{id}", web::delete().to(delete_subject))
                    .route("/classes", web::get().to(list_classes))
                    .route("/classes", web::post().to(create_class))
                    .route("/classes/{id}", web::get().to(get_class))
                    .route("/classes/{id}", web::put().to(update_class))
                    .route("/classes/{id}", web::delete().to(delete_class))
                    .route("/classes/{id}/subjects", web::get().to(list_class_subjects))
                    .route(
                        "/classes/{id}/timetable",
                        web::get().to(list_class_timetable),
                    )
                    .route("/class-subjects", web::post().to(assign_subject))
                    .route(
                        "/class-subjects/{id}",
                        web::delete().to(remove_class_subject),
                    )
                    .route("/timetable", web::post().to(create_timetable_slot))
                    .route("/timetable/{id}", web::delete().to(delete_timetable_slot))
                    .route("/students/{id}/class", web::put().to(assign_student_class))
                    .route("/parents/{id}/children", web::post().to(link_child))
                    .route(
                        "/parents/{id}/children/{student_id}",
                        web::delete().to(unlink_child),
                    )
                    .route("/dashboard/stats", web::get().to(dashboard_stats))
                    .route("/action-logs", web::get().to(list_action_logs))
                    .route("/login-logs", web::get().to(list_login_logs)),
            ),
    );
}
