//! 借阅记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub copy_id: i64,
    pub book_id: i64,
    pub borrower_id: i64,
    pub borrowed_on: String,
    pub due_on: String,
    pub returned_on: Option<String>,
    pub status: String,
    pub days_late: i32,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book_copies::Entity",
        from = "Column::CopyId",
        to = "super::book_copies::Column::Id"
    )]
    Copy,
    #[sea_orm(
        belongs_to = "super::books::Entity",
        from = "Column::BookId",
        to = "super::books::Column::Id"
    )]
    Book,
}

impl Related<super::book_copies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Copy.def()
    }
}

impl Related<super::books::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_loan(
        self,
        book_title: Option<String>,
        copy_number: Option<String>,
    ) -> crate::models::library::entities::Loan {
        use crate::models::library::entities::{Loan, LoanStatus};

        Loan {
            id: self.id,
            copy_id: self.copy_id,
            book_id: self.book_id,
            borrower_id: self.borrower_id,
            borrowed_on: super::to_date(&self.borrowed_on),
            due_on: super::to_date(&self.due_on),
            returned_on: self.returned_on.as_deref().map(super::to_date),
            status: self.status.parse::<LoanStatus>().unwrap_or(LoanStatus::Active),
            days_late: self.days_late,
            book_title,
            copy_number,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
