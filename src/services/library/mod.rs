//! 图书馆：图书与副本、借阅与归还、预约和罚款

pub mod books;
pub mod fines;
pub mod loans;
pub mod reservations;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::library::requests::{
    BookListParams, CreateBookRequest, CreateLoanRequest, CreateReservationRequest,
    FineListParams, LoanListParams,
};
use crate::storage::Storage;

pub struct LibraryService {
    storage: Option<Arc<dyn Storage>>,
}

impl LibraryService {
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

    pub async fn list_books(
        &self,
        request: &HttpRequest,
        params: BookListParams,
    ) -> ActixResult<HttpResponse> {
        books::list_books(self, request, params).await
    }

    pub async fn get_book(&self, request: &HttpRequest, book_id: i64) -> ActixResult<HttpResponse> {
        books::get_book(self, request, book_id).await
    }

    pub async fn create_book(
        &self,
        request: &HttpRequest,
        req: CreateBookRequest,
    ) -> ActixResult<HttpResponse> {
        books::create_book(self, request, req).await
    }

    pub async fn list_loans(
        &self,
        request: &HttpRequest,
        params: LoanListParams,
    ) -> ActixResult<HttpResponse> {
        loans::list_loans(self, request, params).await
    }

    pub async fn create_loan(
        &self,
        request: &HttpRequest,
        req: CreateLoanRequest,
    ) -> ActixResult<HttpResponse> {
        loans::create_loan(self, request, req).await
    }

    pub async fn return_loan(
        &self,
        request: &HttpRequest,
        loan_id: i64,
    ) -> ActixResult<HttpResponse> {
        loans::return_loan(self, request, loan_id).await
    }

    pub async fn my_loans(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        loans::my_loans(self, request).await
    }

    pub async fn create_reservation(
        &self,
        request: &HttpRequest,
        req: CreateReservationRequest,
    ) -> ActixResult<HttpResponse> {
        reservations::create_reservation(self, request, req).await
    }

    pub async fn my_reservations(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        reservations::my_reservations(self, request).await
    }

    pub async fn cancel_reservation(
        &self,
        request: &HttpRequest,
        reservation_id: i64,
    ) -> ActixResult<HttpResponse> {
        reservations::cancel_reservation(self, request, reservation_id).await
    }

    pub async fn list_fines(
        &self,
        request: &HttpRequest,
        params: FineListParams,
    ) -> ActixResult<HttpResponse> {
        fines::list_fines(self, request, params).await
    }

    pub async fn pay_fine(&self, request: &HttpRequest, fine_id: i64) -> ActixResult<HttpResponse> {
        fines::pay_fine(self, request, fine_id).await
    }
}
