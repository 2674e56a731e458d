use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::finance::requests::{
    ClassFeeListParams, CreateClassFeeRequest, CreateFeeTypeRequest, CreateInstallmentRequest,
    CreatePaymentRequest, DateRangeParams, PaymentListParams, RejectPaymentRequest,
    UpdateFeeTypeRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::FinanceService;
use crate::utils::SafeIDI64;

// 懒加载的全局 FinanceService 实例
static FINANCE_SERVICE: Lazy<FinanceService> = Lazy::new(FinanceService::new_lazy);

// 费用类型
pub async fn list_fee_types(req: HttpRequest) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.list_fee_types(&req).await
}

pub async fn create_fee_type(
    req: HttpRequest,
    data: web::Json<CreateFeeTypeRequest>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.create_fee_type(&req, data.into_inner()).await
}

pub async fn update_fee_type(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateFeeTypeRequest>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE
        .update_fee_type(&req, id.0, data.into_inner())
        .await
}

// 班级费用
pub async fn list_class_fees(
    req: HttpRequest,
    query: web::Query<ClassFeeListParams>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.list_class_fees(&req, query.into_inner()).await
}

pub async fn create_class_fee(
    req: HttpRequest,
    data: web::Json<CreateClassFeeRequest>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.create_class_fee(&req, data.into_inner()).await
}

pub async fn delete_class_fee(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.delete_class_fee(&req, id.0).await
}

// 缴费
pub async fn list_payments(
    req: HttpRequest,
    query: web::Query<PaymentListParams>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.list_payments(&req, query.into_inner()).await
}

pub async fn create_payment(
    req: HttpRequest,
    data: web::Json<CreatePaymentRequest>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.create_payment(&req, data.into_inner()).await
}

pub async fn validate_payment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.validate_payment(&req, id.0).await
}

pub async fn reject_payment(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<RejectPaymentRequest>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE
        .reject_payment(&req, id.0, data.into_inner())
        .await
}

pub async fn payment_receipt(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.payment_receipt(&req, id.0).await
}

// 分期与学生财务
pub async fn create_installment(
    req: HttpRequest,
    data: web::Json<CreateInstallmentRequest>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.create_installment(&req, data.into_inner()).await
}

pub async fn student_installments(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.list_student_installments(&req, id.0).await
}

pub async fn student_situation(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.student_situation(&req, id.0).await
}

pub async fn summary_report(
    req: HttpRequest,
    query: web::Query<DateRangeParams>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.summary_report(&req, query.into_inner()).await
}

// 配置路由
pub fn configure_finance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/finance")
            .wrap(middlewares::RequireJWT)
            // 学生本人和关联家长也可查看，权限在服务层检查
            .route("/payments/{id}/receipt", web::get().to(payment_receipt))
            .route("/students/{id}/situation", web::get().to(student_situation))
            .route(
                "/students/{id}/installments",
                web::get().to(student_installments),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::finance_roles()))
                    .route("/fee-types", web::get().to(list_fee_types))
                    .route("/fee-types", web::post().to(create_fee_type))
                    .route("/fee-types/{id}", web::put().to(update_fee_type))
                    .route("/class-fees", web::get().to(list_class_fees))
                    .route("/class-fees", web::post().to(create_class_fee))
                    .route("/class-fees/{id}", web::delete().to(delete_class_fee))
                    .route("/payments", web::get().to(list_payments))
                    .route("/payments", web::post().to(create_payment))
                    .route("/payments/{id}/validate", web::post().to(validate_payment))
                    .route("/payments/{id}/reject", web::post().to(reject_payment))
                    .route("/installments", web::post().to(create_installment))
                    .route("/reports/summary", web::get().to(summary_report)),
            ),
    );
}
