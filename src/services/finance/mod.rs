//! 财务：费用类型、班级费用、缴费、分期、收据和汇总报表

pub mod fees;
pub mod installments;
pub mod payments;
pub mod reports;
pub mod situation;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::finance::requests::{
    ClassFeeListParams, CreateClassFeeRequest, CreateFeeTypeRequest, CreateInstallmentRequest,
    CreatePaymentRequest, DateRangeParams, PaymentListParams, RejectPaymentRequest,
    UpdateFeeTypeRequest,
};
use crate::models::users::entities::{StudentProfile, User, UserRole};
use crate::services::{forbidden, read_error};
use crate::storage::Storage;

pub struct FinanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl FinanceService {
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

    // 费用类型
    pub async fn list_fee_types(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        fees::list_fee_types(self, request).await
    }

    pub async fn create_fee_type(
        &self,
        request: &HttpRequest,
        req: CreateFeeTypeRequest,
    ) -> ActixResult<HttpResponse> {
        fees::create_fee_type(self, request, req).await
    }

    pub async fn update_fee_type(
        &self,
        request: &HttpRequest,
        fee_type_id: i64,
        req: UpdateFeeTypeRequest,
    ) -> ActixResult<HttpResponse> {
        fees::update_fee_type(self, request, fee_type_id, req).await
    }

    // 班级费用
    pub async fn list_class_fees(
        &self,
        request: &HttpRequest,
        params: ClassFeeListParams,
    ) -> ActixResult<HttpResponse> {
        fees::list_class_fees(self, request, params).await
    }

    pub async fn create_class_fee(
        &self,
        request: &HttpRequest,
        req: CreateClassFeeRequest,
    ) -> ActixResult<HttpResponse> {
        fees::create_class_fee(self, request, req).await
    }

    pub async fn delete_class_fee(
        &self,
        request: &HttpRequest,
        class_fee_id: i64,
    ) -> ActixResult<HttpResponse> {
        fees::delete_class_fee(self, request, class_fee_id).await
    }

    // 缴费
    pub async fn list_payments(
        &self,
        request: &HttpRequest,
        params: PaymentListParams,
    ) -> ActixResult<HttpResponse> {
        payments::list_payments(self, request, params).await
    }

    pub async fn create_payment(
        &self,
        request: &HttpRequest,
        req: CreatePaymentRequest,
    ) -> ActixResult<HttpResponse> {
        payments::create_payment(self, request, req).await
    }

    pub async fn validate_payment(
        &self,
        request: &HttpRequest,
        payment_id: i64,
    ) -> ActixResult<HttpResponse> {
        payments::validate_payment(self, request, payment_id).await
    }

    pub async fn reject_payment(
        &self,
        request: &HttpRequest,
        payment_id: i64,
        req: RejectPaymentRequest,
    ) -> ActixResult<HttpResponse> {
        payments::reject_payment(self, request, payment_id, req).await
    }

    pub async fn payment_receipt(
        &self,
        request: &HttpRequest,
        payment_id: i64,
    ) -> ActixResult<HttpResponse> {
        payments::payment_receipt(self, request, payment_id).await
    }

    // 分期
    pub async fn create_installment(
        &self,
        request: &HttpRequest,
        req: CreateInstallmentRequest,
    ) -> ActixResult<HttpResponse> {
        installments::create_installment(self, request, req).await
    }

    pub async fn list_student_installments(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        installments::list_student_installments(self, request, student_id).await
    }

    pub async fn student_situation(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        situation::student_situation(self, request, student_id).await
    }

    pub async fn summary_report(
        &self,
        request: &HttpRequest,
        params: DateRangeParams,
    ) -> ActixResult<HttpResponse> {
        reports::summary_report(self, request, params).await
    }
}

/// 财务人员、学生本人和已关联的家长可以查看学生的财务信息
pub(crate) async fn ensure_can_view_student(
    storage: &dyn Storage,
    user: &User,
    student: &StudentProfile,
) -> Result<(), HttpResponse> {
    let denied = || {
        forbidden(
            ErrorCode::Forbidden,
            "You are not allowed to view this student's finances",
        )
    };

    match user.role {
        UserRole::Admin | UserRole::Accountant => Ok(()),
        UserRole::Student if student.user_id == user.id => Ok(()),
        UserRole::Parent => {
            let parent = match storage.get_parent_by_user_id(user.id).await {
                Ok(Some(parent)) => parent,
                Ok(None) => return Err(denied()),
                Err(e) => return Err(read_error(&e)),
            };
            match storage.is_parent_of(parent.id, student.id).await {
                Ok(true) => Ok(()),
                Ok(false) => Err(denied()),
                Err(e) => Err(read_error(&e)),
            }
        }
        _ => Err(denied()),
    }
}
