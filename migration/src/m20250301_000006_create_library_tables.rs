use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 图书表
        manager
            .create_table(
                Table::create()
                    .table(Books::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Books::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Books::Isbn).string().null())
                    .col(ColumnDef::new(Books::Title).string().not_null())
                    .col(ColumnDef::new(Books::Author).string().not_null())
                    .col(ColumnDef::new(Books::Publisher).string().null())
                    .col(ColumnDef::new(Books::PublishedYear).integer().null())
                    .col(ColumnDef::new(Books::Language).string().null())
                    .col(ColumnDef::new(Books::Category).string().null())
                    .col(ColumnDef::new(Books::TotalCopies).integer().not_null())
                    .col(ColumnDef::new(Books::AvailableCopies).integer().not_null())
                    .col(ColumnDef::new(Books::ShelfMark).string().null())
                    .col(ColumnDef::new(Books::Description).text().null())
                    .col(ColumnDef::new(Books::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 馆藏副本表
        manager
            .create_table(
                Table::create()
                    .table(BookCopies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookCopies::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BookCopies::BookId).big_integer().not_null())
                    .col(
                        ColumnDef::new(BookCopies::CopyNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(BookCopies::Condition).string().not_null())
                    .col(ColumnDef::new(BookCopies::AcquiredOn).string().null())
                    .col(ColumnDef::new(BookCopies::Location).string().null())
                    .col(ColumnDef::new(BookCopies::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(BookCopies::Table, BookCopies::BookId)
                            .to(Books::Table, Books::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 借阅表
        manager
            .create_table(
                Table::create()
                    .table(Loans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Loans::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Loans::CopyId).big_integer().not_null())
                    .col(ColumnDef::new(Loans::BookId).big_integer().not_null())
                    .col(ColumnDef::new(Loans::BorrowerId).big_integer().not_null())
                    .col(ColumnDef::new(Loans::BorrowedOn).string().not_null())
                    .col(ColumnDef::new(Loans::DueOn).string().not_null())
                    .col(ColumnDef::new(Loans::ReturnedOn).string().null())
                    .col(ColumnDef::new(Loans::Status).string().not_null())
                    .col(
                        ColumnDef::new(Loans::DaysLate)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Loans::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Loans::Table, Loans::CopyId)
                            .to(BookCopies::Table, BookCopies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 罚款表
        manager
            .create_table(
                Table::create()
                    .table(Fines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Fines::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Fines::LoanId).big_integer().not_null())
                    .col(ColumnDef::new(Fines::BorrowerId).big_integer().not_null())
                    .col(ColumnDef::new(Fines::Kind).string().not_null())
                    .col(ColumnDef::new(Fines::Amount).double().not_null())
                    .col(ColumnDef::new(Fines::IssuedOn).string().not_null())
                    .col(ColumnDef::new(Fines::Status).string().not_null())
                    .col(ColumnDef::new(Fines::PaidAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Fines::Table, Fines::LoanId)
                            .to(Loans::Table, Loans::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 预约表
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::BookId).big_integer().not_null())
                    .col(ColumnDef::new(Reservations::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Reservations::ReservedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reservations::ExpiresOn).string().not_null())
                    .col(ColumnDef::new(Reservations::Status).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Reservations::Table, Reservations::BookId)
                            .to(Books::Table, Books::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_loans_borrower_status")
                    .table(Loans::Table)
                    .col(Loans::BorrowerId)
                    .col(Loans::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_loans_copy_id")
                    .table(Loans::Table)
                    .col(Loans::CopyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_reservations_book_user")
                    .table(Reservations::Table)
                    .col(Reservations::BookId)
                    .col(Reservations::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Fines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Loans::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BookCopies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Books::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Books {
    #[sea_orm(iden = "books")]
    Table,
    Id,
    Isbn,
    Title,
    Author,
    Publisher,
    PublishedYear,
    Language,
    Category,
    TotalCopies,
    AvailableCopies,
    ShelfMark,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum BookCopies {
    #[sea_orm(iden = "book_copies")]
    Table,
    Id,
    BookId,
    CopyNumber,
    Condition,
    AcquiredOn,
    Location,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Loans {
    #[sea_orm(iden = "loans")]
    Table,
    Id,
    CopyId,
    BookId,
    BorrowerId,
    BorrowedOn,
    DueOn,
    ReturnedOn,
    Status,
    DaysLate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Fines {
    #[sea_orm(iden = "fines")]
    Table,
    Id,
    LoanId,
    BorrowerId,
    Kind,
    Amount,
    IssuedOn,
    Status,
    PaidAt,
}

#[derive(DeriveIden)]
enum Reservations {
    #[sea_orm(iden = "reservations")]
    Table,
    Id,
    BookId,
    UserId,
    ReservedAt,
    ExpiresOn,
    Status,
}
