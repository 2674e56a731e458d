//! 图书馆：图书、副本、借阅、预约与罚款

use std::collections::HashMap;

use super::{SeaOrmStorage, write_error};
use crate::entity::date_to_string;
use crate::entity::prelude::*;
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginatedResponse,
    library::{
        entities::{
            Book, BookCopy, Fine, FineStatus, Loan, LoanStatus, Reservation, ReservationStatus,
            ReturnOutcome,
        },
        requests::{BookListParams, CreateBookRequest, FineListParams, LoanListParams},
    },
};
use crate::utils::{escape_like_pattern, random_code, round2};
use chrono::NaiveDate;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

/// 逾期归还罚款的类型标识
const LATE_RETURN_FINE: &str = "late_return";

impl SeaOrmStorage {
    // ==================== 图书 ====================

    pub async fn list_books_impl(&self, params: BookListParams) -> Result<PaginatedResponse<Book>> {
        use crate::entity::books::Column;

        let mut select = Books::find();

        if let Some(ref search) = params.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Title.contains(&escaped))
                    .add(Column::Author.contains(&escaped))
                    .add(Column::Isbn.contains(&escaped)),
            );
        }

        if let Some(ref category) = params.category {
            select = select.filter(Column::Category.eq(category.as_str()));
        }

        select = select.order_by_asc(Column::Title);

        let (books, pagination) = self.fetch_page(select, &params.pagination, "图书").await?;

        Ok(PaginatedResponse {
            items: books.into_iter().map(|m| m.into_book()).collect(),
            pagination,
        })
    }

    pub async fn get_book_impl(&self, id: i64) -> Result<Option<Book>> {
        let result = Books::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询图书失败: {e}")))?;

        Ok(result.map(|m| m.into_book()))
    }

    /// 创建图书并生成编号连续的副本
    pub async fn create_book_impl(&self, req: CreateBookRequest) -> Result<(Book, Vec<BookCopy>)> {
        let now = chrono::Utc::now().timestamp();
        let copies = Ord::max(req.copies, 0);

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        let book = BookActiveModel {
            isbn: Set(req.isbn),
            title: Set(req.title),
            author: Set(req.author),
            publisher: Set(req.publisher),
            published_year: Set(req.published_year),
            language: Set(req.language),
            category: Set(req.category),
            total_copies: Set(copies),
            available_copies: Set(copies),
            shelf_mark: Set(req.shelf_mark),
            description: Set(req.description),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| write_error("创建图书失败", e))?;

        let mut created = Vec::with_capacity(copies as usize);
        for index in 1..=copies as i64 {
            let copy = BookCopyActiveModel {
                book_id: Set(book.id),
                copy_number: Set(random_code::copy_number(book.id, index)),
                condition: Set("good".to_string()),
                acquired_on: Set(Some(date_to_string(chrono::Local::now().date_naive()))),
                location: Set(book.shelf_mark.clone()),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| write_error("创建图书副本失败", e))?;
            created.push(copy.into_copy());
        }

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((book.into_book(), created))
    }

    pub async fn list_book_copies_impl(&self, book_id: i64) -> Result<Vec<BookCopy>> {
        use crate::entity::book_copies::Column;

        let copies = BookCopies::find()
            .filter(Column::BookId.eq(book_id))
            .order_by_asc(Column::CopyNumber)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询图书副本失败: {e}")))?;

        Ok(copies.into_iter().map(|m| m.into_copy()).collect())
    }

    pub async fn get_copy_impl(&self, id: i64) -> Result<Option<BookCopy>> {
        let result = BookCopies::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询图书副本失败: {e}")))?;

        Ok(result.map(|m| m.into_copy()))
    }

    // ==================== 借阅 ====================

    /// 未归还的借阅即视为占用
    pub async fn is_copy_on_loan_impl(&self, copy_id: i64) -> Result<bool> {
        use crate::entity::loans::Column;

        let count = Loans::find()
            .filter(Column::CopyId.eq(copy_id))
            .filter(Column::ReturnedOn.is_null())
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询借阅状态失败: {e}")))?;

        Ok(count > 0)
    }

    pub async fn count_active_loans_impl(&self, borrower_id: i64) -> Result<u64> {
        use crate::entity::loans::Column;

        Loans::find()
            .filter(Column::BorrowerId.eq(borrower_id))
            .filter(Column::ReturnedOn.is_null())
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计借阅数量失败: {e}")))
    }

    pub async fn create_loan_impl(
        &self,
        copy: &BookCopy,
        borrower_id: i64,
        borrowed_on: NaiveDate,
        due_on: NaiveDate,
    ) -> Result<Loan> {
        use crate::entity::books::Column as BookColumn;
        use crate::entity::loans::Column as LoanColumn;
        use crate::entity::reservations::Column as ReservationColumn;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        // 事务内复查；并发借出同一副本时由 uq_loans_active_copy 兜底
        let on_loan = Loans::find()
            .filter(LoanColumn::CopyId.eq(copy.id))
            .filter(LoanColumn::ReturnedOn.is_null())
            .count(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询借阅状态失败: {e}")))?;
        if on_loan > 0 {
            return Err(CampusError::conflict(format!(
                "副本 {} 已借出",
                copy.copy_number
            )));
        }

        let loan = LoanActiveModel {
            copy_id: Set(copy.id),
            book_id: Set(copy.book_id),
            borrower_id: Set(borrower_id),
            borrowed_on: Set(date_to_string(borrowed_on)),
            due_on: Set(date_to_string(due_on)),
            returned_on: Set(None),
            status: Set(LoanStatus::Active.to_string()),
            days_late: Set(0),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| write_error("创建借阅失败", e))?;

        Books::update_many()
            .col_expr(
                BookColumn::AvailableCopies,
                Expr::col(BookColumn::AvailableCopies).sub(1),
            )
            .filter(BookColumn::Id.eq(copy.book_id))
            .filter(BookColumn::AvailableCopies.gt(0))
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新可借数量失败: {e}")))?;

        // 借阅人自己的预约视为已完成
        Reservations::update_many()
            .col_expr(
                ReservationColumn::Status,
                Expr::value(ReservationStatus::Fulfilled.to_string()),
            )
            .filter(ReservationColumn::BookId.eq(copy.book_id))
            .filter(ReservationColumn::UserId.eq(borrower_id))
            .filter(ReservationColumn::Status.eq(ReservationStatus::Active.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新预约失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        let title = self.get_book_impl(copy.book_id).await?.map(|b| b.title);
        Ok(loan.into_loan(title, Some(copy.copy_number.clone())))
    }

    pub async fn get_loan_impl(&self, id: i64) -> Result<Option<Loan>> {
        let Some(loan) = Loans::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询借阅失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.enrich_loans(vec![loan]).await?.pop())
    }

    /// 归还图书；逾期时在同一事务内开具罚款
    pub async fn return_loan_impl(
        &self,
        id: i64,
        returned_on: NaiveDate,
        outcome: ReturnOutcome,
    ) -> Result<Option<Loan>> {
        use crate::entity::books::Column as BookColumn;
        use crate::entity::loans::Column as LoanColumn;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Loans::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询借阅失败: {e}")))?
        else {
            return Ok(None);
        };

        // 只有未归还的借阅会被更新，重复归还不会再次开罚款或回补库存
        let result = Loans::update_many()
            .col_expr(
                LoanColumn::ReturnedOn,
                Expr::value(date_to_string(returned_on)),
            )
            .col_expr(LoanColumn::Status, Expr::value(outcome.status.to_string()))
            .col_expr(
                LoanColumn::DaysLate,
                Expr::value(outcome.days_late.clamp(0, i32::MAX as i64) as i32),
            )
            .filter(LoanColumn::Id.eq(id))
            .filter(LoanColumn::ReturnedOn.is_null())
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("归还图书失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(CampusError::conflict(format!("借阅 {id} 已归还")));
        }

        let updated = Loans::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询借阅失败: {e}")))?
            .ok_or_else(|| CampusError::not_found(format!("借阅 {id} 不存在")))?;

        Books::update_many()
            .col_expr(
                BookColumn::AvailableCopies,
                Expr::col(BookColumn::AvailableCopies).add(1),
            )
            .filter(BookColumn::Id.eq(existing.book_id))
            .filter(
                Expr::col(BookColumn::AvailableCopies)
                    .lt(Expr::col(BookColumn::TotalCopies)),
            )
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新可借数量失败: {e}")))?;

        if outcome.fine > 0.0 {
            FineActiveModel {
                loan_id: Set(id),
                borrower_id: Set(existing.borrower_id),
                kind: Set(LATE_RETURN_FINE.to_string()),
                amount: Set(round2(outcome.fine)),
                issued_on: Set(date_to_string(returned_on)),
                status: Set(FineStatus::Unpaid.to_string()),
                paid_at: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("开具罚款失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(self.enrich_loans(vec![updated]).await?.pop())
    }

    pub async fn list_loans_impl(&self, params: LoanListParams) -> Result<PaginatedResponse<Loan>> {
        use crate::entity::loans::Column;

        let mut select = Loans::find();
        if let Some(status) = params.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(borrower_id) = params.borrower_id {
            select = select.filter(Column::BorrowerId.eq(borrower_id));
        }
        select = select.order_by_desc(Column::BorrowedOn).order_by_desc(Column::Id);

        let (loans, pagination) = self.fetch_page(select, &params.pagination, "借阅").await?;

        Ok(PaginatedResponse {
            items: self.enrich_loans(loans).await?,
            pagination,
        })
    }

    pub async fn list_borrower_loans_impl(&self, borrower_id: i64) -> Result<Vec<Loan>> {
        use crate::entity::loans::Column;

        let loans = Loans::find()
            .filter(Column::BorrowerId.eq(borrower_id))
            .order_by_desc(Column::BorrowedOn)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询借阅失败: {e}")))?;

        self.enrich_loans(loans).await
    }

    async fn enrich_loans(&self, loans: Vec<LoanModel>) -> Result<Vec<Loan>> {
        if loans.is_empty() {
            return Ok(Vec::new());
        }

        let book_ids: Vec<i64> = loans.iter().map(|l| l.book_id).collect();
        let copy_ids: Vec<i64> = loans.iter().map(|l| l.copy_id).collect();

        let titles = self.book_titles(book_ids).await?;
        let numbers: HashMap<i64, String> = BookCopies::find()
            .filter(crate::entity::book_copies::Column::Id.is_in(copy_ids))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询图书副本失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c.copy_number))
            .collect();

        Ok(loans
            .into_iter()
            .map(|l| {
                let title = titles.get(&l.book_id).cloned();
                let number = numbers.get(&l.copy_id).cloned();
                l.into_loan(title, number)
            })
            .collect())
    }

    async fn book_titles(&self, ids: Vec<i64>) -> Result<HashMap<i64, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        Ok(Books::find()
            .filter(crate::entity::books::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询图书失败: {e}")))?
            .into_iter()
            .map(|b| (b.id, b.title))
            .collect())
    }

    // ==================== 预约 ====================

    pub async fn create_reservation_impl(
        &self,
        book_id: i64,
        user_id: i64,
        expires_on: NaiveDate,
    ) -> Result<Reservation> {
        let reservation = ReservationActiveModel {
            book_id: Set(book_id),
            user_id: Set(user_id),
            reserved_at: Set(chrono::Utc::now().timestamp()),
            expires_on: Set(date_to_string(expires_on)),
            status: Set(ReservationStatus::Active.to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error("创建预约失败", e))?;

        let title = self.get_book_impl(book_id).await?.map(|b| b.title);
        Ok(reservation.into_reservation(title))
    }

    pub async fn has_active_reservation_impl(&self, book_id: i64, user_id: i64) -> Result<bool> {
        use crate::entity::reservations::Column;

        let today = date_to_string(chrono::Local::now().date_naive());
        let count = Reservations::find()
            .filter(Column::BookId.eq(book_id))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Status.eq(ReservationStatus::Active.to_string()))
            .filter(Column::ExpiresOn.gte(today))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询预约失败: {e}")))?;

        Ok(count > 0)
    }

    pub async fn list_user_reservations_impl(&self, user_id: i64) -> Result<Vec<Reservation>> {
        use crate::entity::reservations::Column;

        let reservations = Reservations::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::ReservedAt)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询预约失败: {e}")))?;

        let titles = self
            .book_titles(reservations.iter().map(|r| r.book_id).collect())
            .await?;

        Ok(reservations
            .into_iter()
            .map(|r| {
                let title = titles.get(&r.book_id).cloned();
                r.into_reservation(title)
            })
            .collect())
    }

    pub async fn get_reservation_impl(&self, id: i64) -> Result<Option<Reservation>> {
        let Some(reservation) = Reservations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询预约失败: {e}")))?
        else {
            return Ok(None);
        };

        let title = self.get_book_impl(reservation.book_id).await?.map(|b| b.title);
        Ok(Some(reservation.into_reservation(title)))
    }

    pub async fn cancel_reservation_impl(&self, id: i64) -> Result<bool> {
        use crate::entity::reservations::Column;

        let result = Reservations::update_many()
            .col_expr(
                Column::Status,
                Expr::value(ReservationStatus::Cancelled.to_string()),
            )
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(ReservationStatus::Active.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("取消预约失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    // ==================== 罚款 ====================

    pub async fn list_fines_impl(&self, params: FineListParams) -> Result<PaginatedResponse<Fine>> {
        use crate::entity::fines::Column;

        let mut select = Fines::find();
        if let Some(status) = params.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        select = select.order_by_desc(Column::IssuedOn).order_by_desc(Column::Id);

        let (fines, pagination) = self.fetch_page(select, &params.pagination, "罚款").await?;

        Ok(PaginatedResponse {
            items: fines.into_iter().map(|m| m.into_fine()).collect(),
            pagination,
        })
    }

    pub async fn get_fine_impl(&self, id: i64) -> Result<Option<Fine>> {
        let result = Fines::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询罚款失败: {e}")))?;

        Ok(result.map(|m| m.into_fine()))
    }

    pub async fn pay_fine_impl(&self, id: i64) -> Result<Option<Fine>> {
        use crate::entity::fines::Column;

        if self.get_fine_impl(id).await?.is_none() {
            return Ok(None);
        }

        let result = Fines::update_many()
            .col_expr(Column::Status, Expr::value(FineStatus::Paid.to_string()))
            .col_expr(Column::PaidAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(FineStatus::Unpaid.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("缴纳罚款失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(CampusError::conflict(format!("罚款 {id} 已缴纳")));
        }

        self.get_fine_impl(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;
    use crate::models::users::entities::UserRole;
    use chrono::Duration;

    async fn book_with_copies(storage: &SeaOrmStorage, copies: i32) -> (Book, Vec<BookCopy>) {
        storage
            .create_book_impl(CreateBookRequest {
                isbn: Some("978-2-07-036822-8".into()),
                title: "L'Étranger".into(),
                author: "Albert Camus".into(),
                publisher: None,
                published_year: Some(1942),
                language: Some("fr".into()),
                category: Some("roman".into()),
                copies,
                shelf_mark: Some("R-CAM".into()),
                description: None,
            })
            .await
            .unwrap()
    }

    async fn available(storage: &SeaOrmStorage, book_id: i64) -> i32 {
        storage
            .get_book_impl(book_id)
            .await
            .unwrap()
            .unwrap()
            .available_copies
    }

    #[actix_web::test]
    async fn test_book_creation_numbers_copies() {
        let storage = fixtures::memory_storage().await;
        let (book, copies) = book_with_copies(&storage, 3).await;

        assert_eq!(book.total_copies, 3);
        assert_eq!(book.available_copies, 3);
        assert_eq!(copies.len(), 3);
        assert_eq!(storage.list_book_copies_impl(book.id).await.unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn test_late_return_issues_one_fine_and_restores_copy() {
        let storage = fixtures::memory_storage().await;
        let reader = fixtures::user(&storage, "lecteur", UserRole::Teacher).await;
        let (book, copies) = book_with_copies(&storage, 2).await;

        let today = chrono::Local::now().date_naive();
        let borrowed_on = today - Duration::days(24);
        let due_on = today - Duration::days(10);
        let loan = storage
            .create_loan_impl(&copies[0], reader.id, borrowed_on, due_on)
            .await
            .unwrap();
        assert_eq!(available(&storage, book.id).await, 1);
        assert_eq!(storage.count_active_loans_impl(reader.id).await.unwrap(), 1);

        let outcome = ReturnOutcome::compute(due_on, today, 0.5);
        let returned = storage
            .return_loan_impl(loan.id, today, outcome)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(returned.status, LoanStatus::Late);
        assert_eq!(returned.days_late, 10);
        assert_eq!(available(&storage, book.id).await, 2);

        let err = storage
            .return_loan_impl(loan.id, today, outcome)
            .await
            .unwrap_err();
        assert!(matches!(err, CampusError::Conflict(_)));
        assert_eq!(available(&storage, book.id).await, 2);

        let fines = storage
            .list_fines_impl(FineListParams {
                pagination: Default::default(),
                status: None,
            })
            .await
            .unwrap();
        assert_eq!(fines.items.len(), 1);
        assert_eq!(fines.items[0].amount, 5.0);
        assert_eq!(fines.items[0].borrower_id, reader.id);
    }

    #[actix_web::test]
    async fn test_copy_cannot_be_lent_twice() {
        let storage = fixtures::memory_storage().await;
        let first = fixtures::user(&storage, "premier_lecteur", UserRole::Teacher).await;
        let second = fixtures::user(&storage, "second_lecteur", UserRole::Teacher).await;
        let (book, copies) = book_with_copies(&storage, 2).await;

        let today = chrono::Local::now().date_naive();
        let due_on = today + Duration::days(14);
        storage
            .create_loan_impl(&copies[0], first.id, today, due_on)
            .await
            .unwrap();

        let err = storage
            .create_loan_impl(&copies[0], second.id, today, due_on)
            .await
            .unwrap_err();
        assert!(matches!(err, CampusError::Conflict(_)));
        assert_eq!(available(&storage, book.id).await, 1);
        assert_eq!(storage.count_active_loans_impl(second.id).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn test_loan_fulfils_borrower_reservation() {
        let storage = fixtures::memory_storage().await;
        let reader = fixtures::user(&storage, "reserveur", UserRole::Teacher).await;
        let (book, copies) = book_with_copies(&storage, 1).await;

        let today = chrono::Local::now().date_naive();
        let reservation = storage
            .create_reservation_impl(book.id, reader.id, today + Duration::days(3))
            .await
            .unwrap();
        assert!(storage.has_active_reservation_impl(book.id, reader.id).await.unwrap());

        storage
            .create_loan_impl(&copies[0], reader.id, today, today + Duration::days(14))
            .await
            .unwrap();

        let stored = storage.get_reservation_impl(reservation.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReservationStatus::Fulfilled);
        assert!(!storage.cancel_reservation_impl(reservation.id).await.unwrap());
    }

    #[actix_web::test]
    async fn test_fine_is_paid_once() {
        let storage = fixtures::memory_storage().await;
        let reader = fixtures::user(&storage, "retard", UserRole::Teacher).await;
        let (_, copies) = book_with_copies(&storage, 1).await;

        let today = chrono::Local::now().date_naive();
        let due_on = today - Duration::days(2);
        let loan = storage
            .create_loan_impl(&copies[0], reader.id, today - Duration::days(9), due_on)
            .await
            .unwrap();
        storage
            .return_loan_impl(loan.id, today, ReturnOutcome::compute(due_on, today, 1.0))
            .await
            .unwrap();

        let fine_id = storage
            .list_fines_impl(FineListParams {
                pagination: Default::default(),
                status: None,
            })
            .await
            .unwrap()
            .items[0]
            .id;

        let paid = storage.pay_fine_impl(fine_id).await.unwrap().unwrap();
        assert_eq!(paid.status, FineStatus::Paid);
        assert!(paid.paid_at.is_some());

        let err = storage.pay_fine_impl(fine_id).await.unwrap_err();
        assert!(matches!(err, CampusError::Conflict(_)));
    }
}
