//! 缺勤记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "absences")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub subject_id: Option<i64>,
    pub absence_date: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub absence_type: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub justification: Option<String>,
    pub teacher_id: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_absence(self) -> crate::models::grades::entities::Absence {
        use crate::models::grades::entities::{Absence, AbsenceType};

        Absence {
            id: self.id,
            student_id: self.student_id,
            class_id: self.class_id,
            subject_id: self.subject_id,
            absence_date: super::to_date(&self.absence_date),
            start_time: self.start_time,
            end_time: self.end_time,
            absence_type: self
                .absence_type
                .parse::<AbsenceType>()
                .unwrap_or(AbsenceType::Unjustified),
            justification: self.justification,
            teacher_id: self.teacher_id,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
