use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FinanceService, ensure_can_view_student};
use crate::models::audit::entities::NewActionLog;
use crate::models::communication::entities::{NewNotification, NotificationKind};
use crate::models::finance::entities::{Payment, PaymentStatus};
use crate::models::finance::requests::{
    CreatePaymentRequest, PaymentListParams, PaymentQuery, RejectPaymentRequest,
};
use crate::models::finance::responses::Receipt;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::system::DynamicConfig;
use crate::services::{
    bad_request, client_ip, current_user, not_found, notify, read_error, storage_error,
};
use crate::storage::Storage;
use crate::utils::random_code::receipt_number;
use crate::utils::validate::parse_date;

/// 解析可选日期参数
pub(crate) fn parse_optional_date(
    value: Option<&str>,
) -> Result<Option<chrono::NaiveDate>, String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(parse_date)
        .transpose()
}

async fn find_payment(storage: &dyn Storage, payment_id: i64) -> Result<Payment, HttpResponse> {
    match storage.get_payment(payment_id).await {
        Ok(Some(payment)) => Ok(payment),
        Ok(None) => Err(not_found(ErrorCode::PaymentNotFound, "Payment not found")),
        Err(e) => Err(read_error(&e)),
    }
}

/// 只有待处理的缴费可以验证或驳回
fn ensure_pending(payment: &Payment) -> Result<(), HttpResponse> {
    match payment.status {
        PaymentStatus::Pending => Ok(()),
        PaymentStatus::Validated => Err(bad_request(
            ErrorCode::PaymentAlreadyProcessed,
            "Payment is already validated",
        )),
        PaymentStatus::Rejected => Err(bad_request(
            ErrorCode::PaymentAlreadyProcessed,
            "Payment has been rejected",
        )),
    }
}

async fn notify_student(storage: &dyn Storage, student_id: i64, kind: NotificationKind, message: String) {
    let title = match kind {
        NotificationKind::PaymentValidated => "Payment validated",
        _ => "Payment rejected",
    };
    if let Ok(Some(student)) = storage.get_student_by_id(student_id).await {
        notify(
            storage,
            NewNotification {
                user_id: student.user_id,
                kind,
                title: title.to_string(),
                message,
                link: Some("/student/finance".to_string()),
            },
        )
        .await;
    }
}

pub async fn list_payments(
    service: &FinanceService,
    request: &HttpRequest,
    params: PaymentListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let (date_from, date_to) = match (
        parse_optional_date(params.date_from.as_deref()),
        parse_optional_date(params.date_to.as_deref()),
    ) {
        (Ok(from), Ok(to)) => (from, to),
        (Err(msg), _) | (_, Err(msg)) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
    };

    let (page, size) = params.pagination.normalized();
    let query = PaymentQuery {
        student_id: params.student_id,
        status: params.status,
        method: params.method,
        date_from,
        date_to,
        page,
        size,
    };

    match storage.list_payments(query).await {
        Ok(payments) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            payments,
            "Payments retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

/// 登记缴费，状态为 pending，等待财务验证
pub async fn create_payment(
    service: &FinanceService,
    request: &HttpRequest,
    mut req: CreatePaymentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if !req.amount.is_finite() || req.amount <= 0.0 {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "Amount must be greater than zero",
        ));
    }
    let paid_on = match parse_optional_date(req.paid_on.as_deref()) {
        Ok(date) => date.unwrap_or_else(|| chrono::Local::now().date_naive()),
        Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
    };
    req.reference = req
        .reference
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    match storage.get_student_by_id(req.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(read_error(&e)),
    }
    match storage.get_fee_type(req.fee_type_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::FeeTypeNotFound, "Fee type not found")),
        Err(e) => return Ok(read_error(&e)),
    }

    match storage.create_payment(user.id, req, paid_on).await {
        Ok(payment) => {
            let log = NewActionLog::new(user.id, "payment.create")
                .entity("payment", payment.id)
                .details(format!("{:.2} {}", payment.amount, payment.method))
                .ip(client_ip(request));
            if let Err(e) = storage.record_action(log).await {
                tracing::warn!("Failed to record action log: {}", e);
            }
            Ok(HttpResponse::Created().json(ApiResponse::success(
                payment,
                "Payment recorded successfully",
            )))
        }
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

pub async fn validate_payment(
    service: &FinanceService,
    request: &HttpRequest,
    payment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let payment = match find_payment(storage.as_ref(), payment_id).await {
        Ok(payment) => payment,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_pending(&payment) {
        return Ok(resp);
    }

    let validated = match storage.validate_payment(payment_id, user.id).await {
        Ok(Some(payment)) => payment,
        Ok(None) => return Ok(not_found(ErrorCode::PaymentNotFound, "Payment not found")),
        Err(e) => return Ok(storage_error(&e, ErrorCode::PaymentAlreadyProcessed)),
    };

    let log = NewActionLog::new(user.id, "payment.validate")
        .entity("payment", payment_id)
        .ip(client_ip(request));
    if let Err(e) = storage.record_action(log).await {
        tracing::warn!("Failed to record action log: {}", e);
    }

    notify_student(
        storage.as_ref(),
        validated.student_id,
        NotificationKind::PaymentValidated,
        format!("Your payment of {:.2} has been validated", validated.amount),
    )
    .await;

    tracing::info!("Payment {} validated by {}", payment_id, user.username);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        validated,
        "Payment validated successfully",
    )))
}

pub async fn reject_payment(
    service: &FinanceService,
    request: &HttpRequest,
    payment_id: i64,
    req: RejectPaymentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let reason = req.reason.trim();
    if reason.is_empty() {
        return Ok(bad_request(ErrorCode::BadRequest, "reason is required"));
    }

    let payment = match find_payment(storage.as_ref(), payment_id).await {
        Ok(payment) => payment,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_pending(&payment) {
        return Ok(resp);
    }

    let rejected = match storage.reject_payment(payment_id, reason).await {
        Ok(Some(payment)) => payment,
        Ok(None) => return Ok(not_found(ErrorCode::PaymentNotFound, "Payment not found")),
        Err(e) => return Ok(storage_error(&e, ErrorCode::PaymentAlreadyProcessed)),
    };

    let log = NewActionLog::new(user.id, "payment.reject")
        .entity("payment", payment_id)
        .details(reason.to_string())
        .ip(client_ip(request));
    if let Err(e) = storage.record_action(log).await {
        tracing::warn!("Failed to record action log: {}", e);
    }

    notify_student(
        storage.as_ref(),
        rejected.student_id,
        NotificationKind::PaymentRejected,
        format!("Your payment of {:.2} was rejected: {}", rejected.amount, reason),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        rejected,
        "Payment rejected successfully",
    )))
}

/// 收据编号优先使用缴费凭证号
fn receipt_number_of(payment: &Payment) -> String {
    payment
        .reference
        .clone()
        .unwrap_or_else(|| receipt_number(payment.id))
}

pub async fn payment_receipt(
    service: &FinanceService,
    request: &HttpRequest,
    payment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let payment = match find_payment(storage.as_ref(), payment_id).await {
        Ok(payment) => payment,
        Err(resp) => return Ok(resp),
    };

    let profile = match storage.get_student_by_id(payment.student_id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(read_error(&e)),
    };
    if let Err(resp) = ensure_can_view_student(storage.as_ref(), &user, &profile).await {
        return Ok(resp);
    }

    let student = match storage.get_student_summary(profile.id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(read_error(&e)),
    };
    let fee_type_label = match storage.get_fee_type(payment.fee_type_id).await {
        Ok(Some(fee_type)) => fee_type.label,
        Ok(None) => String::new(),
        Err(e) => return Ok(read_error(&e)),
    };

    let receipt = Receipt {
        receipt_number: receipt_number_of(&payment),
        school_name: DynamicConfig::school_name().await,
        paid_on: payment.paid_on,
        student,
        fee_type_label,
        amount: payment.amount,
        method: payment.method,
        status: payment.status,
        issued_at: chrono::Utc::now(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        receipt,
        "Receipt generated successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::finance::entities::PaymentMethod;

    fn payment(status: PaymentStatus, reference: Option<&str>) -> Payment {
        let now = chrono::Utc::now();
        Payment {
            id: 42,
            student_id: 1,
            fee_type_id: 1,
            amount: 25_000.0,
            method: PaymentMethod::Cash,
            reference: reference.map(str::to_string),
            paid_on: now.date_naive(),
            status,
            note: None,
            rejection_reason: None,
            recorded_by: 1,
            validated_by: None,
            validated_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_receipt_number_prefers_reference() {
        assert_eq!(receipt_number_of(&payment(PaymentStatus::Pending, None)), "PAY000042");
        assert_eq!(
            receipt_number_of(&payment(PaymentStatus::Pending, Some("BK-77"))),
            "BK-77"
        );
    }

    #[test]
    fn test_only_pending_payments_can_be_processed() {
        assert!(ensure_pending(&payment(PaymentStatus::Pending, None)).is_ok());
        assert!(ensure_pending(&payment(PaymentStatus::Validated, None)).is_err());
        assert!(ensure_pending(&payment(PaymentStatus::Rejected, None)).is_err());
    }

    #[test]
    fn test_parse_optional_date() {
        assert_eq!(parse_optional_date(None), Ok(None));
        assert_eq!(parse_optional_date(Some("  ")), Ok(None));
        assert!(parse_optional_date(Some("2025-02-30")).is_err());
        assert!(parse_optional_date(Some("2025-02-03")).unwrap().is_some());
    }
}
