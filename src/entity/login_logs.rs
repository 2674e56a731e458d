//! 登录日志实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "login_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Option<i64>,
    pub identifier: String,
    pub success: bool,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_log(self) -> crate::models::audit::entities::LoginLog {
        crate::models::audit::entities::LoginLog {
            id: self.id,
            user_id: self.user_id,
            identifier: self.identifier,
            success: self.success,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
