use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DbBackend};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 同一副本同时只能有一条未归还的借阅
///
/// MySQL 不支持部分索引，只依赖借出事务内的复查。
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() == DbBackend::MySql {
            return Ok(());
        }

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_loans_active_copy \
                 ON loans (copy_id) WHERE returned_on IS NULL",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() == DbBackend::MySql {
            return Ok(());
        }

        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS uq_loans_active_copy")
            .await?;

        Ok(())
    }
}
