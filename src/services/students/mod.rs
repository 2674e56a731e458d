//! 学生端：个人档案、成绩、平均分、排名、成绩单、升级结论、考勤、课表和财务

pub mod profile;
pub mod results;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::grades::requests::GradeListParams;
use crate::models::users::entities::{StudentProfile, User};
use crate::models::{ErrorCode, PaginationQuery};
use crate::services::finance::situation::{ensure_not_locked, situation_response};
use crate::services::{current_user, not_found, read_error};
use crate::storage::Storage;

pub struct StudentPortalService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentPortalService {
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

    pub async fn profile(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::get_profile(self, request).await
    }

    pub async fn timetable(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::get_timetable(self, request).await
    }

    pub async fn grades(
        &self,
        request: &HttpRequest,
        params: GradeListParams,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let (_, student) = match current_student(storage.as_ref(), request).await {
            Ok(found) => found,
            Err(resp) => return Ok(resp),
        };
        if let Err(resp) = ensure_not_locked(storage.as_ref(), &student).await {
            return Ok(resp);
        }
        Ok(results::grades_response(storage.as_ref(), &student, params).await)
    }

    pub async fn averages(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let (_, student) = match current_student(storage.as_ref(), request).await {
            Ok(found) => found,
            Err(resp) => return Ok(resp),
        };
        if let Err(resp) = ensure_not_locked(storage.as_ref(), &student).await {
            return Ok(resp);
        }
        Ok(results::averages_response(storage.as_ref(), &student).await)
    }

    pub async fn ranking(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let (_, student) = match current_student(storage.as_ref(), request).await {
            Ok(found) => found,
            Err(resp) => return Ok(resp),
        };
        if let Err(resp) = ensure_not_locked(storage.as_ref(), &student).await {
            return Ok(resp);
        }
        Ok(results::ranking_response(storage.as_ref(), &student).await)
    }

    pub async fn report_card(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let (_, student) = match current_student(storage.as_ref(), request).await {
            Ok(found) => found,
            Err(resp) => return Ok(resp),
        };
        if let Err(resp) = ensure_not_locked(storage.as_ref(), &student).await {
            return Ok(resp);
        }
        Ok(results::report_card_response(storage.as_ref(), &student).await)
    }

    pub async fn decisions(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let (_, student) = match current_student(storage.as_ref(), request).await {
            Ok(found) => found,
            Err(resp) => return Ok(resp),
        };
        if let Err(resp) = ensure_not_locked(storage.as_ref(), &student).await {
            return Ok(resp);
        }
        Ok(results::decisions_response(storage.as_ref(), &student).await)
    }

    pub async fn absences(
        &self,
        request: &HttpRequest,
        pagination: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let (_, student) = match current_student(storage.as_ref(), request).await {
            Ok(found) => found,
            Err(resp) => return Ok(resp),
        };
        Ok(results::absences_response(storage.as_ref(), &student, pagination).await)
    }

    pub async fn finance(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let (_, student) = match current_student(storage.as_ref(), request).await {
            Ok(found) => found,
            Err(resp) => return Ok(resp),
        };
        Ok(situation_response(storage.as_ref(), &student).await)
    }
}

/// 当前登录学生及其档案
pub(crate) async fn current_student(
    storage: &dyn Storage,
    request: &HttpRequest,
) -> Result<(User, StudentProfile), HttpResponse> {
    let user = current_user(request)?;
    match storage.get_student_by_user_id(user.id).await {
        Ok(Some(student)) => Ok((user, student)),
        Ok(None) => Err(not_found(
            ErrorCode::StudentNotFound,
            "Student profile not found",
        )),
        Err(e) => Err(read_error(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::finance::entities::PaymentMethod;
    use crate::models::finance::requests::{CreateFeeTypeRequest, CreatePaymentRequest};
    use crate::routes::students;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, fixtures};
    use actix_web::dev::Service as _;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpMessage, test, web};
    use chrono::NaiveDate;

    /// 班级收费 1000 的学生，返回其账号
    async fn billed_student(storage: &SeaOrmStorage) -> (User, StudentProfile, i64) {
        let school = fixtures::school(storage).await;
        let class_id = fixtures::class(storage, &school, "T1", 30).await;
        let fee = storage
            .create_fee_type_impl(CreateFeeTypeRequest {
                code: "SCOL".into(),
                label: "Scolarité".into(),
                amount: 1000.0,
                is_mandatory: true,
            })
            .await
            .unwrap();
        storage
            .create_class_fee_impl(class_id, fee.id, 1000.0, school.year_id)
            .await
            .unwrap();

        let student = fixtures::student(storage, "debiteur", Some(class_id), Some(school.year_id)).await;
        let user = storage
            .get_user_by_id_impl(student.user_id)
            .await
            .unwrap()
            .unwrap();
        (user, student, fee.id)
    }

    async fn get_grades(storage: SeaOrmStorage, user: User) -> (StatusCode, serde_json::Value) {
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let app = test::init_service(
            App::new().app_data(web::Data::new(storage)).service(
                web::scope("/student")
                    .wrap_fn(move |req, srv| {
                        req.extensions_mut().insert(user.clone());
                        srv.call(req)
                    })
                    .route("/grades", web::get().to(students::grades)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/student/grades").to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        (status, test::read_body_json(resp).await)
    }

    #[actix_web::test]
    async fn test_unpaid_fees_lock_grades() {
        let storage = fixtures::memory_storage().await;
        let (user, _, _) = billed_student(&storage).await;

        let (status, body) = get_grades(storage, user).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["data"]["has_unpaid"], true);
        assert_eq!(body["data"]["balance"], 1000.0);
    }

    #[actix_web::test]
    async fn test_paid_fees_unlock_grades() {
        let storage = fixtures::memory_storage().await;
        let (user, student, fee_type_id) = billed_student(&storage).await;
        let payment = storage
            .create_payment_impl(
                1,
                CreatePaymentRequest {
                    student_id: student.id,
                    fee_type_id,
                    amount: 1000.0,
                    method: PaymentMethod::BankTransfer,
                    reference: None,
                    paid_on: None,
                    note: None,
                },
                NaiveDate::from_ymd_opt(2025, 9, 15).unwrap(),
            )
            .await
            .unwrap();
        storage.validate_payment_impl(payment.id, 1).await.unwrap();

        let (status, _) = get_grades(storage, user).await;
        assert_eq!(status, StatusCode::OK);
    }
}
