//! 学生档案实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    #[sea_orm(unique)]
    pub student_number: String,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    pub class_id: Option<i64>,
    pub academic_year_id: Option<i64>,
    pub enrolled_at: i64,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_profile(self) -> crate::models::users::entities::StudentProfile {
        crate::models::users::entities::StudentProfile {
            id: self.id,
            user_id: self.user_id,
            student_number: self.student_number,
            birth_date: self.birth_date.as_deref().map(super::to_date),
            gender: self.gender,
            class_id: self.class_id,
            academic_year_id: self.academic_year_id,
            enrolled_at: super::to_datetime(self.enrolled_at),
            is_active: self.is_active,
        }
    }
}
