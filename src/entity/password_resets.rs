//! 密码重置令牌实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "password_resets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    #[sea_orm(unique)]
    pub token: String,
    pub expires_at: i64,
    pub used: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_reset(self) -> crate::models::audit::entities::PasswordReset {
        crate::models::audit::entities::PasswordReset {
            id: self.id,
            user_id: self.user_id,
            token: self.token,
            expires_at: super::to_datetime(self.expires_at),
            used: self.used,
        }
    }
}
