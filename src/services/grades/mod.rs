//! 教师端：任课班级、成绩录入与验证、考勤

pub mod absences;
pub mod classes;
pub mod compute;
pub mod entry;
pub mod rules;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::grades::requests::{
    CreateAbsenceRequest, CreateGradeRequest, GradeListParams, JustifyAbsenceRequest,
    UpdateGradeRequest,
};
use crate::models::users::entities::User;
use crate::services::{forbidden, read_error};
use crate::storage::Storage;

pub struct TeachingService {
    storage: Option<Arc<dyn Storage>>,
}

impl TeachingService {
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

    pub async fn list_classes(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        classes::list_classes(self, request).await
    }

    pub async fn list_subjects(
        &self,
        request: &HttpRequest,
        class_id: Option<i64>,
    ) -> ActixResult<HttpResponse> {
        classes::list_subjects(self, request, class_id).await
    }

    pub async fn list_class_students(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        classes::list_class_students(self, request, class_id).await
    }

    pub async fn create_grade(
        &self,
        request: &HttpRequest,
        req: CreateGradeRequest,
    ) -> ActixResult<HttpResponse> {
        entry::create_grade(self, request, req).await
    }

    pub async fn update_grade(
        &self,
        request: &HttpRequest,
        grade_id: i64,
        req: UpdateGradeRequest,
    ) -> ActixResult<HttpResponse> {
        entry::update_grade(self, request, grade_id, req).await
    }

    pub async fn validate_grade(
        &self,
        request: &HttpRequest,
        grade_id: i64,
    ) -> ActixResult<HttpResponse> {
        entry::validate_grade(self, request, grade_id).await
    }

    pub async fn grade_history(
        &self,
        request: &HttpRequest,
        grade_id: i64,
    ) -> ActixResult<HttpResponse> {
        entry::grade_history(self, request, grade_id).await
    }

    pub async fn student_grades(
        &self,
        request: &HttpRequest,
        student_id: i64,
        params: GradeListParams,
    ) -> ActixResult<HttpResponse> {
        entry::student_grades(self, request, student_id, params).await
    }

    pub async fn create_absence(
        &self,
        request: &HttpRequest,
        req: CreateAbsenceRequest,
    ) -> ActixResult<HttpResponse> {
        absences::create_absence(self, request, req).await
    }

    pub async fn justify_absence(
        &self,
        request: &HttpRequest,
        absence_id: i64,
        req: JustifyAbsenceRequest,
    ) -> ActixResult<HttpResponse> {
        absences::justify_absence(self, request, absence_id, req).await
    }
}

/// 教师必须教授该班级的该科目，管理员不受限制
pub(crate) async fn ensure_assigned(
    storage: &dyn Storage,
    user: &User,
    class_id: i64,
    subject_id: i64,
) -> Result<(), HttpResponse> {
    if user.is_admin() {
        return Ok(());
    }
    match storage
        .is_teacher_assigned(user.id, class_id, subject_id)
        .await
    {
        Ok(true) => Ok(()),
        Ok(false) => Err(forbidden(
            ErrorCode::TeacherNotAssigned,
            "You are not assigned to this subject in this class",
        )),
        Err(e) => Err(read_error(&e)),
    }
}

/// 教师必须至少在该班教一门课，管理员不受限制
pub(crate) async fn ensure_teaches_class(
    storage: &dyn Storage,
    user: &User,
    class_id: i64,
) -> Result<(), HttpResponse> {
    if user.is_admin() {
        return Ok(());
    }
    match storage.list_teacher_subjects(user.id, Some(class_id)).await {
        Ok(subjects) if !subjects.is_empty() => Ok(()),
        Ok(_) => Err(forbidden(
            ErrorCode::TeacherNotAssigned,
            "You do not teach in this class",
        )),
        Err(e) => Err(read_error(&e)),
    }
}
