//! 班级排名实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rankings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub rank: i32,
    pub general_average: f64,
    pub period: String,
    pub academic_year_id: Option<i64>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_ranking(self) -> crate::models::grades::entities::Ranking {
        crate::models::grades::entities::Ranking {
            student_id: self.student_id,
            class_id: self.class_id,
            rank: self.rank,
            general_average: self.general_average,
            period: self.period,
        }
    }
}
