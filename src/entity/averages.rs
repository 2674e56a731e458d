//! 科目平均分实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "averages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub class_id: i64,
    pub value: f64,
    pub period: String,
    pub academic_year_id: Option<i64>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_average(
        self,
        subject: Option<super::subjects::Model>,
    ) -> crate::models::grades::entities::SubjectAverage {
        let (subject_label, coefficient) = subject
            .map(|s| (s.label, s.coefficient))
            .unwrap_or_else(|| (String::new(), 1.0));

        crate::models::grades::entities::SubjectAverage {
            student_id: self.student_id,
            subject_id: self.subject_id,
            class_id: self.class_id,
            subject_label,
            coefficient,
            value: self.value,
            period: self.period,
        }
    }
}
