//! 班级科目分配实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "class_subjects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    /// 任课教师的用户 ID
    pub teacher_id: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_class_subject(
        self,
        subject: Option<super::subjects::Model>,
        teacher_name: String,
    ) -> crate::models::academics::entities::ClassSubject {
        let (subject_code, subject_label, coefficient) = subject
            .map(|s| (s.code, s.label, s.coefficient))
            .unwrap_or_else(|| (String::new(), String::new(), 1.0));

        crate::models::academics::entities::ClassSubject {
            id: self.id,
            class_id: self.class_id,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
            subject_code,
            subject_label,
            coefficient,
            teacher_name,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
