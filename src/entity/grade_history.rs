//! 成绩修改历史实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grade_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub grade_id: i64,
    pub old_value: f64,
    pub new_value: f64,
    pub modified_by: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub reason: Option<String>,
    pub modified_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::grades::Entity",
        from = "Column::GradeId",
        to = "super::grades::Column::Id"
    )]
    Grade,
}

impl Related<super::grades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grade.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_history(self) -> crate::models::grades::entities::GradeHistory {
        crate::models::grades::entities::GradeHistory {
            id: self.id,
            grade_id: self.grade_id,
            old_value: self.old_value,
            new_value: self.new_value,
            modified_by: self.modified_by,
            reason: self.reason,
            modified_at: super::to_datetime(self.modified_at),
        }
    }
}
