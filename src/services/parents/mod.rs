//! 家长端：孩子列表以及每个孩子的成绩、平均分、考勤、财务和成绩单
//!
//! 所有按孩子的接口都要求家长与学生已关联，否则 403。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::grades::requests::GradeListParams;
use crate::models::users::entities::StudentProfile;
use crate::models::users::responses::ChildrenResponse;
use crate::models::{ApiResponse, ErrorCode, PaginationQuery};
use crate::services::finance::situation::{ensure_not_locked, situation_response};
use crate::services::students::results;
use crate::services::{current_user, forbidden, not_found, read_error};
use crate::storage::Storage;

pub struct ParentPortalService {
    storage: Option<Arc<dyn Storage>>,
}

impl ParentPortalService {
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

    pub async fn children(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let user = match current_user(request) {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        };

        let parent = match storage.get_parent_by_user_id(user.id).await {
            Ok(Some(parent)) => parent,
            Ok(None) => {
                return Ok(not_found(
                    ErrorCode::ParentNotFound,
                    "Parent profile not found",
                ));
            }
            Err(e) => return Ok(read_error(&e)),
        };

        match storage.list_parent_children(parent.id).await {
            Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                ChildrenResponse { items },
                "Children retrieved successfully",
            ))),
            Err(e) => Ok(read_error(&e)),
        }
    }

    pub async fn child_grades(
        &self,
        request: &HttpRequest,
        student_id: i64,
        params: GradeListParams,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let child = match linked_child(storage.as_ref(), request, student_id).await {
            Ok(child) => child,
            Err(resp) => return Ok(resp),
        };
        if let Err(resp) = ensure_not_locked(storage.as_ref(), &child).await {
            return Ok(resp);
        }
        Ok(results::grades_response(storage.as_ref(), &child, params).await)
    }

    pub async fn child_averages(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let child = match linked_child(storage.as_ref(), request, student_id).await {
            Ok(child) => child,
            Err(resp) => return Ok(resp),
        };
        if let Err(resp) = ensure_not_locked(storage.as_ref(), &child).await {
            return Ok(resp);
        }
        Ok(results::averages_response(storage.as_ref(), &child).await)
    }

    pub async fn child_report_card(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let child = match linked_child(storage.as_ref(), request, student_id).await {
            Ok(child) => child,
            Err(resp) => return Ok(resp),
        };
        if let Err(resp) = ensure_not_locked(storage.as_ref(), &child).await {
            return Ok(resp);
        }
        Ok(results::report_card_response(storage.as_ref(), &child).await)
    }

    pub async fn child_absences(
        &self,
        request: &HttpRequest,
        student_id: i64,
        pagination: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let child = match linked_child(storage.as_ref(), request, student_id).await {
            Ok(child) => child,
            Err(resp) => return Ok(resp),
        };
        Ok(results::absences_response(storage.as_ref(), &child, pagination).await)
    }

    pub async fn child_finance(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let child = match linked_child(storage.as_ref(), request, student_id).await {
            Ok(child) => child,
            Err(resp) => return Ok(resp),
        };
        Ok(situation_response(storage.as_ref(), &child).await)
    }
}

/// 取家长名下的孩子，未关联时 403
async fn linked_child(
    storage: &dyn Storage,
    request: &HttpRequest,
    student_id: i64,
) -> Result<StudentProfile, HttpResponse> {
    let user = current_user(request)?;
    let not_linked = || forbidden(ErrorCode::Forbidden, "This student is not linked to you");

    let parent = match storage.get_parent_by_user_id(user.id).await {
        Ok(Some(parent)) => parent,
        Ok(None) => return Err(not_linked()),
        Err(e) => return Err(read_error(&e)),
    };
    match storage.is_parent_of(parent.id, student_id).await {
        Ok(true) => {}
        Ok(false) => return Err(not_linked()),
        Err(e) => return Err(read_error(&e)),
    }

    match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => Ok(student),
        Ok(None) => Err(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => Err(read_error(&e)),
    }
}
