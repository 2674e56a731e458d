use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::library::requests::{
    BookListParams, CreateBookRequest, CreateLoanRequest, CreateReservationRequest,
    FineListParams, LoanListParams,
};
use crate::models::users::entities::UserRole;
use crate::services::LibraryService;
use crate::utils::SafeIDI64;

// 懒加载的全局 LibraryService 实例
static LIBRARY_SERVICE: Lazy<LibraryService> = Lazy::new(LibraryService::new_lazy);

pub async fn list_books(
    req: HttpRequest,
    query: web::Query<BookListParams>,
) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.list_books(&req, query.into_inner()).await
}

pub async fn get_book(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.get_book(&req, id.0).await
}

pub async fn create_book(
    req: HttpRequest,
    data: web::Json<CreateBookRequest>,
) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.create_book(&req, data.into_inner()).await
}

pub async fn list_loans(
    req: HttpRequest,
    query: web::Query<LoanListParams>,
) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.list_loans(&req, query.into_inner()).await
}

pub async fn create_loan(
    req: HttpRequest,
    data: web::Json<CreateLoanRequest>,
) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.create_loan(&req, data.into_inner()).await
}

pub async fn return_loan(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.return_loan(&req, id.0).await
}

pub async fn my_loans(req: HttpRequest) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.my_loans(&req).await
}

pub async fn create_reservation(
    req: HttpRequest,
    data: web::Json<CreateReservationRequest>,
) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE
        .create_reservation(&req, data.into_inner())
        .await
}

pub async fn my_reservations(req: HttpRequest) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.my_reservations(&req).await
}

pub async fn cancel_reservation(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.cancel_reservation(&req, id.0).await
}

pub async fn list_fines(
    req: HttpRequest,
    query: web::Query<FineListParams>,
) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.list_fines(&req, query.into_inner()).await
}

pub async fn pay_fine(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.pay_fine(&req, id.0).await
}

fn admin_only() -> middlewares::RequireRole {
    middlewares::RequireRole::new_any(UserRole::admin_roles())
}

// 配置路由
pub fn configure_library_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/library")
            .wrap(middlewares::RequireJWT)
            .service(
                // 所有登录用户可检索，仅管理员录入
                web::resource("/books")
                    .route(web::get().to(list_books))
                    .route(web::post().to(create_book).wrap(admin_only())),
            )
            .service(web::resource("/books/{id}").route(web::get().to(get_book)))
            .service(
                web::resource("/loans")
                    .route(web::get().to(list_loans).wrap(admin_only()))
                    .route(web::post().to(create_loan).wrap(admin_only())),
            )
            .service(
                web::resource("/loans/{id}/return")
                    .route(web::post().to(return_loan).wrap(admin_only())),
            )
            .service(web::resource("/my-loans").route(web::get().to(my_loans)))
            .service(web::resource("/reservations").route(web::post().to(create_reservation)))
            .service(
                // 本人或管理员取消，服务层检查
                web::resource("/reservations/{id}")
                    .route(web::delete().to(cancel_reservation)),
            )
            .service(web::resource("/my-reservations").route(web::get().to(my_reservations)))
            .service(
                web::resource("/fines").route(web::get().to(list_fines).wrap(admin_only())),
            )
            .service(
                web::resource("/fines/{id}/pay")
                    .route(web::post().to(pay_fine).wrap(admin_only())),
            ),
    );
}
