use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 费用类型表
        manager
            .create_table(
                Table::create()
                    .table(FeeTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeeTypes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FeeTypes::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(FeeTypes::Label).string().not_null())
                    .col(ColumnDef::new(FeeTypes::Amount).double().not_null())
                    .col(
                        ColumnDef::new(FeeTypes::IsMandatory)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(FeeTypes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(FeeTypes::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 班级费用表
        manager
            .create_table(
                Table::create()
                    .table(ClassFees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassFees::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClassFees::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(ClassFees::FeeTypeId).big_integer().not_null())
                    .col(ColumnDef::new(ClassFees::Amount).double().not_null())
                    .col(
                        ColumnDef::new(ClassFees::AcademicYearId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassFees::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassFees::Table, ClassFees::FeeTypeId)
                            .to(FeeTypes::Table, FeeTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 缴费记录表
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Payments::FeeTypeId).big_integer().not_null())
                    .col(ColumnDef::new(Payments::Amount).double().not_null())
                    .col(ColumnDef::new(Payments::Method).string().not_null())
                    .col(ColumnDef::new(Payments::Reference).string().null())
                    .col(ColumnDef::new(Payments::PaidOn).string().not_null())
                    .col(ColumnDef::new(Payments::Status).string().not_null())
                    .col(ColumnDef::new(Payments::Note).text().null())
                    .col(ColumnDef::new(Payments::RejectionReason).text().null())
                    .col(ColumnDef::new(Payments::RecordedBy).big_integer().not_null())
                    .col(ColumnDef::new(Payments::ValidatedBy).big_integer().null())
                    .col(ColumnDef::new(Payments::ValidatedAt).big_integer().null())
                    .col(ColumnDef::new(Payments::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Payments::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 分期缴费表
        manager
            .create_table(
                Table::create()
                    .table(Installments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Installments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Installments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Installments::FeeTypeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Installments::TotalAmount).double().not_null())
                    .col(
                        ColumnDef::new(Installments::PaidAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Installments::DueDate).string().null())
                    .col(ColumnDef::new(Installments::Status).string().not_null())
                    .col(
                        ColumnDef::new(Installments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Installments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Installments::Table, Installments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_class_fees_unique")
                    .table(ClassFees::Table)
                    .col(ClassFees::ClassId)
                    .col(ClassFees::FeeTypeId)
                    .col(ClassFees::AcademicYearId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payments_student_status")
                    .table(Payments::Table)
                    .col(Payments::StudentId)
                    .col(Payments::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payments_paid_on")
                    .table(Payments::Table)
                    .col(Payments::PaidOn)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_installments_student_fee")
                    .table(Installments::Table)
                    .col(Installments::StudentId)
                    .col(Installments::FeeTypeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Installments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClassFees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeeTypes::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum FeeTypes {
    #[sea_orm(iden = "fee_types")]
    Table,
    Id,
    Code,
    Label,
    Amount,
    IsMandatory,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ClassFees {
    #[sea_orm(iden = "class_fees")]
    Table,
    Id,
    ClassId,
    FeeTypeId,
    Amount,
    AcademicYearId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Payments {
    #[sea_orm(iden = "payments")]
    Table,
    Id,
    StudentId,
    FeeTypeId,
    Amount,
    Method,
    Reference,
    PaidOn,
    Status,
    Note,
    RejectionReason,
    RecordedBy,
    ValidatedBy,
    ValidatedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Installments {
    #[sea_orm(iden = "installments")]
    Table,
    Id,
    StudentId,
    FeeTypeId,
    TotalAmount,
    PaidAmount,
    DueDate,
    Status,
    CreatedAt,
    UpdatedAt,
}
