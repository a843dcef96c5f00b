//! Reservation DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::ReserveRoom;
use crate::domain::Reservation;

/// Dates use the ISO `YYYY-MM-DD` form.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReserveRoomRequest {
    #[validate(range(min = 1, message = "roomNumber must be a positive integer"))]
    pub room_number: i32,
    #[validate(length(min = 1, max = 100, message = "customerName must be 1-100 characters"))]
    pub customer_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<ReserveRoomRequest> for ReserveRoom {
    fn from(r: ReserveRoomRequest) -> Self {
        Self {
            room_number: r.room_number,
            customer_name: r.customer_name,
            start_date: r.start_date,
            end_date: r.end_date,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CancelReservationRequest {
    #[validate(length(min = 1, message = "reservationId is required"))]
    pub reservation_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDto {
    pub id: String,
    pub customer_name: String,
    pub room_number: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            customer_name: r.customer_name,
            room_number: r.room_number,
            start_date: r.start_date,
            end_date: r.end_date,
            status: r.status.as_str().to_string(),
            created_at: r.created_at,
            cancelled_at: r.cancelled_at,
        }
    }
}
