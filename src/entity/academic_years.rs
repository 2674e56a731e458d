//! 学年实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "academic_years")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub label: String,
    pub start_date: String,
    pub end_date: String,
    pub is_active: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::classes::Entity")]
    Classes,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_academic_year(self) -> crate::models::academics::entities::AcademicYear {
        crate::models::academics::entities::AcademicYear {
            id: self.id,
            code: self.code,
            label: self.label,
            start_date: super::to_date(&self.start_date),
            end_date: super::to_date(&self.end_date),
            is_active: self.is_active,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
