//! 导出记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "export_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub kind: String,
    pub format: String,
    pub filename: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub parameters: Option<String>,
    pub row_count: i64,
    pub size_bytes: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_log(self) -> crate::models::exports::entities::ExportLog {
        crate::models::exports::entities::ExportLog {
            id: self.id,
            user_id: self.user_id,
            kind: self.kind,
            format: self.format,
            filename: self.filename,
            parameters: self.parameters,
            row_count: self.row_count,
            size_bytes: self.size_bytes,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
