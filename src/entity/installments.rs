//! 分期缴费实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "installments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub fee_type_id: i64,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub due_date: Option<String>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_installment(self) -> crate::models::finance::entities::Installment {
        use crate::models::finance::entities::{Installment, InstallmentStatus};

        Installment {
            id: self.id,
            student_id: self.student_id,
            fee_type_id: self.fee_type_id,
            total_amount: self.total_amount,
            paid_amount: self.paid_amount,
            due_date: self.due_date.as_deref().map(super::to_date),
            status: self
                .status
                .parse::<InstallmentStatus>()
                .unwrap_or(InstallmentStatus::Pending),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
