use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::LibraryService;
use crate::models::communication::entities::{NewNotification, NotificationKind};
use crate::models::library::entities::{LoanStatus, ReturnOutcome};
use crate::models::library::requests::{CreateLoanRequest, LoanListParams};
use crate::models::{ApiResponse, ErrorCode, ItemsResponse};
use crate::services::system::DynamicConfig;
use crate::services::{bad_request, current_user, not_found, notify, read_error, storage_error};

/// 单次借阅的最长天数
const MAX_LOAN_DAYS: i64 = 90;

pub async fn list_loans(
    service: &LibraryService,
    request: &HttpRequest,
    params: LoanListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_loans(params).await {
        Ok(loans) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            loans,
            "Loans retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

/// 借出副本
///
/// 副本必须存在且未借出；借阅人活跃借阅数必须小于 `library.loan_limit`。
pub async fn create_loan(
    service: &LibraryService,
    request: &HttpRequest,
    req: CreateLoanRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let days = match req.days {
        Some(days) if !(1..=MAX_LOAN_DAYS).contains(&days) => {
            return Ok(bad_request(
                ErrorCode::BadRequest,
                format!("days must be between 1 and {MAX_LOAN_DAYS}"),
            ));
        }
        Some(days) => days,
        None => DynamicConfig::loan_days().await,
    };

    let copy = match storage.get_copy(req.copy_id).await {
        Ok(Some(copy)) => copy,
        Ok(None) => return Ok(not_found(ErrorCode::CopyNotFound, "Copy not found")),
        Err(e) => return Ok(read_error(&e)),
    };
    match storage.is_copy_on_loan(copy.id).await {
        Ok(false) => {}
        Ok(true) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::CopyUnavailable,
                "Copy is already on loan",
            )));
        }
        Err(e) => return Ok(read_error(&e)),
    }

    match storage.get_user_by_id(req.borrower_id).await {
        Ok(Some(borrower)) if borrower.is_active() => {}
        Ok(Some(_)) => {
            return Ok(bad_request(
                ErrorCode::AccountInactive,
                "Borrower account is not active",
            ));
        }
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "Borrower not found")),
        Err(e) => return Ok(read_error(&e)),
    }

    let limit = DynamicConfig::loan_limit().await;
    match storage.count_active_loans(req.borrower_id).await {
        Ok(active) if (active as i64) < limit => {}
        Ok(_) => {
            return Ok(bad_request(
                ErrorCode::LoanLimitReached,
                format!("Borrower already has {limit} active loans"),
            ));
        }
        Err(e) => return Ok(read_error(&e)),
    }

    let today = chrono::Local::now().date_naive();
    let due_on = today + chrono::Duration::days(days);

    match storage
        .create_loan(&copy, req.borrower_id, today, due_on)
        .await
    {
        Ok(loan) => {
            tracing::info!("Copy {} lent to user {}", copy.copy_number, loan.borrower_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                loan,
                "Loan created successfully",
            )))
        }
        Err(e) => Ok(storage_error(&e, ErrorCode::CopyUnavailable)),
    }
}

/// 归还并按逾期天数开具罚款
pub async fn return_loan(
    service: &LibraryService,
    request: &HttpRequest,
    loan_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let loan = match storage.get_loan(loan_id).await {
        Ok(Some(loan)) => loan,
        Ok(None) => return Ok(not_found(ErrorCode::LoanNotFound, "Loan not found")),
        Err(e) => return Ok(read_error(&e)),
    };
    if loan.status != LoanStatus::Active {
        return Ok(bad_request(
            ErrorCode::LoanAlreadyReturned,
            "Loan has already been returned",
        ));
    }

    let today = chrono::Local::now().date_naive();
    let outcome = ReturnOutcome::compute(loan.due_on, today, DynamicConfig::daily_fine().await);

    match storage.return_loan(loan_id, today, outcome).await {
        Ok(Some(returned)) => {
            if outcome.fine > 0.0 {
                notify(
                    storage.as_ref(),
                    NewNotification {
                        user_id: returned.borrower_id,
                        kind: NotificationKind::Library,
                        title: "Late return fine".to_string(),
                        message: format!(
                            "Returned {} day(s) late, a fine of {:.2} was issued",
                            outcome.days_late, outcome.fine
                        ),
                        link: None,
                    },
                )
                .await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                returned,
                "Loan returned successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::LoanNotFound, "Loan not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::LoanAlreadyReturned)),
    }
}

pub async fn my_loans(service: &LibraryService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match storage.list_borrower_loans(user.id).await {
        Ok(loans) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(loans),
            "Loans retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::library::requests::CreateBookRequest;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::test;
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_loan_limit_is_enforced() {
        let storage = fixtures::memory_storage().await;
        let borrower = fixtures::user(&storage, "lecteur", UserRole::Teacher).await;
        let limit = DynamicConfig::loan_limit().await as usize;
        let (_, copies) = storage
            .create_book_impl(CreateBookRequest {
                isbn: None,
                title: "Les Misérables".into(),
                author: "Victor Hugo".into(),
                publisher: None,
                published_year: None,
                language: None,
                category: None,
                copies: limit as i32 + 1,
                shelf_mark: None,
                description: None,
            })
            .await
            .unwrap();

        let today = chrono::Local::now().date_naive();
        for copy in copies.iter().take(limit) {
            storage
                .create_loan_impl(copy, borrower.id, today, today + chrono::Duration::days(14))
                .await
                .unwrap();
        }

        let service = LibraryService {
            storage: Some(Arc::new(storage)),
        };
        let request = test::TestRequest::default().to_http_request();
        let resp = create_loan(
            &service,
            &request,
            CreateLoanRequest {
                copy_id: copies[limit].id,
                borrower_id: borrower.id,
                days: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["code"], ErrorCode::LoanLimitReached as i32);
    }
}
