use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 导出记录表
        manager
            .create_table(
                Table::create()
                    .table(ExportLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExportLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExportLogs::UserId).big_integer().not_null())
                    .col(ColumnDef::new(ExportLogs::Kind).string().not_null())
                    .col(ColumnDef::new(ExportLogs::Format).string().not_null())
                    .col(ColumnDef::new(ExportLogs::Filename).string().not_null())
                    .col(ColumnDef::new(ExportLogs::Parameters).text().null())
                    .col(ColumnDef::new(ExportLogs::RowCount).big_integer().not_null())
                    .col(ColumnDef::new(ExportLogs::SizeBytes).big_integer().not_null())
                    .col(ColumnDef::new(ExportLogs::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_export_logs_user_id")
                            .from(ExportLogs::Table, ExportLogs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_export_logs_user_id")
                    .table(ExportLogs::Table)
                    .col(ExportLogs::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExportLogs::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ExportLogs {
    #[sea_orm(iden = "export_logs")]
    Table,
    Id,
    UserId,
    Kind,
    Format,
    Filename,
    Parameters,
    RowCount,
    SizeBytes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
}
