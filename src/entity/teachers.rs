//! 教师档案实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    #[sea_orm(unique)]
    pub staff_number: String,
    pub specialty: Option<String>,
    pub hired_on: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_profile(self) -> crate::models::users::entities::TeacherProfile {
        crate::models::users::entities::TeacherProfile {
            id: self.id,
            user_id: self.user_id,
            staff_number: self.staff_number,
            specialty: self.specialty,
            hired_on: self.hired_on.as_deref().map(super::to_date),
            is_active: self.is_active,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
