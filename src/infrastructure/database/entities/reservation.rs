//! Reservation entity
//!
//! `room_number` is a plain column rather than a foreign key: cancelled
//! history outlives rooms that are later removed from the inventory.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub customer_name: String,
    pub room_number: i32,

    pub start_date: Date,
    pub end_date: Date,

    /// Reservation status: booked, cancelled
    pub status: String,

    pub created_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub cancelled_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
