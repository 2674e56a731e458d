use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::LibraryService;
use crate::models::library::requests::{BookListParams, CreateBookRequest};
use crate::models::library::responses::BookDetail;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, not_found, read_error, storage_error};
use crate::utils::validate::validate_required;

/// 单次入库的副本上限
const MAX_COPIES: i32 = 500;

fn trim_optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn check_book(req: &CreateBookRequest) -> Result<(), String> {
    validate_required(&req.title, "title")?;
    validate_required(&req.author, "author")?;
    if req.copies < 1 || req.copies > MAX_COPIES {
        return Err(format!("copies must be between 1 and {MAX_COPIES}"));
    }
    Ok(())
}

pub async fn list_books(
    service: &LibraryService,
    request: &HttpRequest,
    params: BookListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_books(params).await {
        Ok(books) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            books,
            "Books retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

pub async fn get_book(
    service: &LibraryService,
    request: &HttpRequest,
    book_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let book = match storage.get_book(book_id).await {
        Ok(Some(book)) => book,
        Ok(None) => return Ok(not_found(ErrorCode::BookNotFound, "Book not found")),
        Err(e) => return Ok(read_error(&e)),
    };

    match storage.list_book_copies(book_id).await {
        Ok(copies) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            BookDetail { book, copies },
            "Book retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

/// 创建图书并生成 N 个副本
pub async fn create_book(
    service: &LibraryService,
    request: &HttpRequest,
    mut req: CreateBookRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    req.title = req.title.trim().to_string();
    req.author = req.author.trim().to_string();
    req.isbn = trim_optional(req.isbn);
    req.category = trim_optional(req.category);
    if let Err(msg) = check_book(&req) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    match storage.create_book(req).await {
        Ok((book, copies)) => {
            tracing::info!("Book {} created with {} copies", book.id, copies.len());
            Ok(HttpResponse::Created().json(ApiResponse::success(
                BookDetail { book, copies },
                "Book created successfully",
            )))
        }
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(copies: i32) -> CreateBookRequest {
        CreateBookRequest {
            isbn: None,
            title: "Une si longue lettre".into(),
            author: "Mariama Bâ".into(),
            publisher: None,
            published_year: Some(1979),
            language: Some("fr".into()),
            category: None,
            copies,
            shelf_mark: None,
            description: None,
        }
    }

    #[test]
    fn test_copies_bounds() {
        assert!(check_book(&request(1)).is_ok());
        assert!(check_book(&request(0)).is_err());
        assert!(check_book(&request(MAX_COPIES + 1)).is_err());
    }

    #[test]
    fn test_title_required() {
        let mut req = request(2);
        req.title = "  ".into();
        assert!(check_book(&req).is_err());
    }
}
