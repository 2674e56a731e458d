//! 班级费用实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "class_fees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub fee_type_id: i64,
    pub amount: f64,
    pub academic_year_id: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fee_types::Entity",
        from = "Column::FeeTypeId",
        to = "super::fee_types::Column::Id"
    )]
    FeeType,
}

impl Related<super::fee_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_class_fee(
        self,
        fee_type: Option<super::fee_types::Model>,
    ) -> crate::models::finance::entities::ClassFee {
        crate::models::finance::entities::ClassFee {
            id: self.id,
            class_id: self.class_id,
            fee_type_id: self.fee_type_id,
            amount: self.amount,
            academic_year_id: self.academic_year_id,
            fee_type_label: fee_type.map(|f| f.label),
            created_at: super::to_datetime(self.created_at),
        }
    }
}
