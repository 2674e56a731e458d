//! 图书实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub isbn: Option<String>,
    pub title: String,
    pub author: String,
    pub publisher: Option<String>,
    pub published_year: Option<i32>,
    pub language: Option<String>,
    pub category: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
    pub shelf_mark: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::book_copies::Entity")]
    Copies,
}

impl Related<super::book_copies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Copies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_book(self) -> crate::models::library::entities::Book {
        crate::models::library::entities::Book {
            id: self.id,
            isbn: self.isbn,
            title: self.title,
            author: self.author,
            publisher: self.publisher,
            published_year: self.published_year,
            language: self.language,
            category: self.category,
            total_copies: self.total_copies,
            available_copies: self.available_copies,
            shelf_mark: self.shelf_mark,
            description: self.description,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
