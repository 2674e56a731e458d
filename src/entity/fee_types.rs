//! 费用类型实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub label: String,
    pub amount: f64,
    pub is_mandatory: bool,
    pub is_active: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::class_fees::Entity")]
    ClassFees,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::class_fees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassFees.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_fee_type(self) -> crate::models::finance::entities::FeeType {
        crate::models::finance::entities::FeeType {
            id: self.id,
            code: self.code,
            label: self.label,
            amount: self.amount,
            is_mandatory: self.is_mandatory,
            is_active: self.is_active,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
