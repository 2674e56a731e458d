//! 图书预约实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub reserved_at: i64,
    pub expires_on: String,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::books::Entity",
        from = "Column::BookId",
        to = "super::books::Column::Id"
    )]
    Book,
}

impl Related<super::books::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_reservation(
        self,
        book_title: Option<String>,
    ) -> crate::models::library::entities::Reservation {
        use crate::models::library::entities::{Reservation, ReservationStatus};

        Reservation {
            id: self.id,
            book_id: self.book_id,
            user_id: self.user_id,
            reserved_at: super::to_datetime(self.reserved_at),
            expires_on: super::to_date(&self.expires_on),
            status: self
                .status
                .parse::<ReservationStatus>()
                .unwrap_or(ReservationStatus::Active),
            book_title,
        }
    }
}
