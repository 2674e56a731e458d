//! 教务管理（管理员）
//!
//! 学年、专业、年级、班级、科目、任课安排、课表、分班以及后台统计和审计日志。

pub mod assignments;
pub mod audit;
pub mod classes;
pub mod dashboard;
pub mod enrollment;
pub mod structure;
pub mod years;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::academics::requests::{
    AssignSubjectRequest, ClassListParams, CreateAcademicYearRequest, CreateClassRequest,
    CreateLevelRequest, CreateProgramRequest, CreateSubjectRequest, CreateTimetableSlotRequest,
    UpdateAcademicYearRequest, UpdateClassRequest, UpdateLevelRequest, UpdateProgramRequest,
    UpdateSubjectRequest,
};
use crate::models::audit::requests::AuditLogParams;
use crate::models::users::requests::{AssignClassRequest, LinkChildRequest};
use crate::storage::Storage;

pub struct AcademicService {
    storage: Option<Arc<dyn Storage>>,
}

impl AcademicService {
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

    // 学年
    pub async fn list_years(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        years::list_years(self, request).await
    }

    pub async fn create_year(
        &self,
        request: &HttpRequest,
        req: CreateAcademicYearRequest,
    ) -> ActixResult<HttpResponse> {
        years::create_year(self, request, req).await
    }

    pub async fn update_year(
        &self,
        request: &HttpRequest,
        id: i64,
        req: UpdateAcademicYearRequest,
    ) -> ActixResult<HttpResponse> {
        years::update_year(self, request, id, req).await
    }

    pub async fn activate_year(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        years::activate_year(self, request, id).await
    }

    // 专业
    pub async fn list_programs(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        structure::list_programs(self, request).await
    }

    pub async fn create_program(
        &self,
        request: &HttpRequest,
        req: CreateProgramRequest,
    ) -> ActixResult<HttpResponse> {
        structure::create_program(self, request, req).await
    }

    pub async fn update_program(
        &self,
        request: &HttpRequest,
        id: i64,
        req: UpdateProgramRequest,
    ) -> ActixResult<HttpResponse> {
        structure::update_program(self, request, id, req).await
    }

    pub async fn delete_program(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        structure::delete_program(self, request, id).await
    }

    // 年级
    pub async fn list_levels(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        structure::list_levels(self, request).await
    }

    pub async fn create_level(
        &self,
        request: &HttpRequest,
        req: CreateLevelRequest,
    ) -> ActixResult<HttpResponse> {
        structure::create_level(self, request, req).await
    }

    pub async fn update_level(
        &self,
        request: &HttpRequest,
        id: i64,
        req: UpdateLevelRequest,
    ) -> ActixResult<HttpResponse> {
        structure::update_level(self, request, id, req).await
    }

    pub async fn delete_level(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        structure::delete_level(self, request, id).await
    }

    // 科目
    pub async fn list_subjects(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        structure::list_subjects(self, request).await
    }

    pub async fn create_subject(
        &self,
        request: &HttpRequest,
        req: CreateSubjectRequest,
    ) -> ActixResult<HttpResponse> {
        structure::create_subject(self, request, req).await
    }

    pub async fn update_subject(
        &self,
        request: &HttpRequest,
        id: i64,
        req: UpdateSubjectRequest,
    ) -> ActixResult<HttpResponse> {
        structure::update_subject(self, request, id, req).await
    }

    pub async fn delete_subject(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        structure::delete_subject(self, request, id).await
    }

    // 班级
    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        params: ClassListParams,
    ) -> ActixResult<HttpResponse> {
        classes::list_classes(self, request, params).await
    }

    pub async fn create_class(
        &self,
        request: &HttpRequest,
        req: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        classes::create_class(self, request, req).await
    }

    pub async fn get_class(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        classes::get_class(self, request, id).await
    }

    pub async fn update_class(
        &self,
        request: &HttpRequest,
        id: i64,
        req: UpdateClassRequest,
    ) -> ActixResult<HttpResponse> {
        classes::update_class(self, request, id, req).await
    }

    pub async fn delete_class(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        classes::delete_class(self, request, id).await
    }

    // 任课安排与课表
    pub async fn assign_subject(
        &self,
        request: &HttpRequest,
        req: AssignSubjectRequest,
    ) -> ActixResult<HttpResponse> {
        assignments::assign_subject(self, request, req).await
    }

    pub async fn list_class_subjects(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        assignments::list_class_subjects(self, request, class_id).await
    }

    pub async fn remove_class_subject(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        assignments::remove_class_subject(self, request, id).await
    }

    pub async fn create_timetable_slot(
        &self,
        request: &HttpRequest,
        req: CreateTimetableSlotRequest,
    ) -> ActixResult<HttpResponse> {
        assignments::create_timetable_slot(self, request, req).await
    }

    pub async fn list_class_timetable(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        assignments::list_class_timetable(self, request, class_id).await
    }

    pub async fn delete_timetable_slot(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        assignments::delete_timetable_slot(self, request, id).await
    }

    // 分班与家长关联
    pub async fn assign_student_class(
        &self,
        request: &HttpRequest,
        student_id: i64,
        req: AssignClassRequest,
    ) -> ActixResult<HttpResponse> {
        enrollment::assign_student_class(self, request, student_id, req).await
    }

    pub async fn link_child(
        &self,
        request: &HttpRequest,
        parent_user_id: i64,
        req: LinkChildRequest,
    ) -> ActixResult<HttpResponse> {
        enrollment::link_child(self, request, parent_user_id, req).await
    }

    pub async fn unlink_child(
        &self,
        request: &HttpRequest,
        parent_user_id: i64,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        enrollment::unlink_child(self, request, parent_user_id, student_id).await
    }

    // 统计与审计
    pub async fn dashboard_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        dashboard::dashboard_stats(self, request).await
    }

    pub async fn list_action_logs(
        &self,
        request: &HttpRequest,
        params: AuditLogParams,
    ) -> ActixResult<HttpResponse> {
        audit::list_action_logs(self, request, params).await
    }

    pub async fn list_login_logs(
        &self,
        request: &HttpRequest,
        params: AuditLogParams,
    ) -> ActixResult<HttpResponse> {
        audit::list_login_logs(self, request, params).await
    }
}
