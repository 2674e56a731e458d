//! 罚款实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub loan_id: i64,
    pub borrower_id: i64,
    pub kind: String,
    pub amount: f64,
    pub issued_on: String,
    pub status: String,
    pub paid_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_fine(self) -> crate::models::library::entities::Fine {
        use crate::models::library::entities::{Fine, FineStatus};

        Fine {
            id: self.id,
            loan_id: self.loan_id,
            borrower_id: self.borrower_id,
            kind: self.kind,
            amount: self.amount,
            issued_on: super::to_date(&self.issued_on),
            status: self.status.parse::<FineStatus>().unwrap_or(FineStatus::Unpaid),
            paid_at: self.paid_at.map(super::to_datetime),
        }
    }
}
