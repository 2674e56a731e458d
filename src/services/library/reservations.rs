use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::LibraryService;
use crate::models::library::entities::ReservationStatus;
use crate::models::library::requests::CreateReservationRequest;
use crate::models::{ApiResponse, ErrorCode, ItemsResponse};
use crate::services::system::DynamicConfig;
use crate::services::{bad_request, current_user, forbidden, not_found, read_error, storage_error};

/// 只有全部副本都已借出时才能预约
pub async fn create_reservation(
    service: &LibraryService,
    request: &HttpRequest,
    req: CreateReservationRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let book = match storage.get_book(req.book_id).await {
        Ok(Some(book)) => book,
        Ok(None) => return Ok(not_found(ErrorCode::BookNotFound, "Book not found")),
        Err(e) => return Ok(read_error(&e)),
    };
    if book.available_copies > 0 {
        return Ok(bad_request(
            ErrorCode::ReservationNotAllowed,
            "A copy is available, reservation is not needed",
        ));
    }

    match storage.has_active_reservation(book.id, user.id).await {
        Ok(false) => {}
        Ok(true) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ReservationAlreadyExists,
                "You already have an active reservation for this book",
            )));
        }
        Err(e) => return Ok(read_error(&e)),
    }

    let expires_on = chrono::Local::now().date_naive()
        + chrono::Duration::days(DynamicConfig::reservation_days().await);

    match storage.create_reservation(book.id, user.id, expires_on).await {
        Ok(reservation) => Ok(HttpResponse::Created().json(ApiResponse::success(
            reservation,
            "Reservation created successfully",
        ))),
        Err(e) => Ok(storage_error(&e, ErrorCode::ReservationAlreadyExists)),
    }
}

pub async fn my_reservations(
    service: &LibraryService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match storage.list_user_reservations(user.id).await {
        Ok(reservations) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(reservations),
            "Reservations retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn cancel_reservation(
    service: &LibraryService,
    request: &HttpRequest,
    reservation_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let reservation = match storage.get_reservation(reservation_id).await {
        Ok(Some(reservation)) => reservation,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::ReservationNotFound,
                "Reservation not found",
            ));
        }
        Err(e) => return Ok(read_error(&e)),
    };
    if reservation.user_id != user.id && !user.is_admin() {
        return Ok(forbidden(
            ErrorCode::Forbidden,
            "You can only cancel your own reservations",
        ));
    }
    if reservation.status != ReservationStatus::Active {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "Only active reservations can be cancelled",
        ));
    }

    match storage.cancel_reservation(reservation_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
            "Reservation cancelled successfully",
        ))),
        Ok(false) => Ok(not_found(
            ErrorCode::ReservationNotFound,
            "Reservation not found",
        )),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}
