//! Room inventory DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{AvailabilitySummary, Room};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddRoomRequest {
    #[validate(range(min = 1, message = "roomNumber must be a positive integer"))]
    pub room_number: i32,
    /// `1bhk`, `2bhk` or `suite`
    #[validate(length(min = 1, message = "roomType is required"))]
    pub room_type: String,
    #[validate(range(exclusive_min = 0.0, message = "price must be greater than 0"))]
    pub price: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub room_number: i32,
    pub room_type: String,
    pub price: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Room> for RoomDto {
    fn from(r: Room) -> Self {
        Self {
            room_number: r.room_number,
            room_type: r.room_type.as_str().to_string(),
            price: r.price,
            status: r.status.as_str().to_string(),
            created_at: r.created_at,
        }
    }
}

/// One row of the available-rooms summary
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySummaryDto {
    pub room_type: String,
    pub count: usize,
    pub price: f64,
}

impl From<AvailabilitySummary> for AvailabilitySummaryDto {
    fn from(s: AvailabilitySummary) -> Self {
        Self {
            room_type: s.room_type.as_str().to_string(),
            count: s.count,
            price: s.price,
        }
    }
}
