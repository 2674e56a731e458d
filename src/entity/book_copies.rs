//! 馆藏副本实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "book_copies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub book_id: i64,
    #[sea_orm(unique)]
    pub copy_number: String,
    pub condition: String,
    pub acquired_on: Option<String>,
    pub location: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::books::Entity",
        from = "Column::BookId",
        to = "super::books::Column::Id"
    )]
    Book,
}

impl Related<super::books::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_copy(self) -> crate::models::library::entities::BookCopy {
        crate::models::library::entities::BookCopy {
            id: self.id,
            book_id: self.book_id,
            copy_number: self.copy_number,
            condition: self.condition,
            acquired_on: self.acquired_on.as_deref().map(super::to_date),
            location: self.location,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
