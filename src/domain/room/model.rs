//! Room domain entity

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::shared::DomainError;

/// Room category offered by the hotel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoomType {
    OneBedroom,
    TwoBedroom,
    Suite,
}

impl RoomType {
    /// Every room type, in seeding order.
    pub const ALL: [RoomType; 3] = [Self::OneBedroom, Self::TwoBedroom, Self::Suite];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneBedroom => "1bhk",
            Self::TwoBedroom => "2bhk",
            Self::Suite => "suite",
        }
    }

    /// Nightly rate used when seeding the inventory.
    pub fn default_price(&self) -> f64 {
        match self {
            Self::OneBedroom => 100.0,
            Self::TwoBedroom => 150.0,
            Self::Suite => 200.0,
        }
    }
}

impl FromStr for RoomType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1bhk" | "1-bedroom" => Ok(Self::OneBedroom),
            "2bhk" | "2-bedroom" => Ok(Self::TwoBedroom),
            "suite" => Ok(Self::Suite),
            other => Err(DomainError::Validation(format!(
                "roomType must be one of 1bhk, 2bhk, suite (got '{}')",
                other
            ))),
        }
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Occupancy state of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    /// No active reservation
    Available,
    /// Held by an active reservation
    Reserved,
    /// Occupied under an active reservation
    Booked,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Booked => "booked",
        }
    }

    /// `true` when an active reservation holds the room.
    pub fn is_held(&self) -> bool {
        !matches!(self, Self::Available)
    }
}

impl FromStr for RoomStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "reserved" => Ok(Self::Reserved),
            "booked" => Ok(Self::Booked),
            other => Err(DomainError::Validation(format!(
                "unknown room status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A physical room in the inventory
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    /// Business key, unique across the inventory
    pub room_number: i32,
    pub room_type: RoomType,
    /// Nightly rate
    pub price: f64,
    pub status: RoomStatus,
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// Build an available room, rejecting non-positive numbers and prices.
    pub fn new(room_number: i32, room_type: RoomType, price: f64) -> Result<Self, DomainError> {
        if room_number < 1 {
            return Err(DomainError::Validation(
                "roomNumber must be a positive integer".into(),
            ));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(DomainError::Validation(
                "price must be a positive number".into(),
            ));
        }

        Ok(Self {
            room_number,
            room_type,
            price,
            status: RoomStatus::Available,
            created_at: Utc::now(),
        })
    }

    pub fn is_available(&self) -> bool {
        self.status == RoomStatus::Available
    }
}

/// Per-type view of the available inventory
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilitySummary {
    pub room_type: RoomType,
    pub count: usize,
    /// Rate of the lowest-numbered available room of this type
    pub price: f64,
}

impl AvailabilitySummary {
    /// Aggregate available rooms by type. Input order decides which room's
    /// price represents the type, so callers pass rooms sorted by number.
    pub fn from_rooms(rooms: &[Room]) -> Vec<Self> {
        let mut summaries: Vec<Self> = Vec::new();
        for room in rooms.iter().filter(|r| r.is_available()) {
            match summaries.iter_mut().find(|s| s.room_type == room.room_type) {
                Some(summary) => summary.count += 1,
                None => summaries.push(Self {
                    room_type: room.room_type,
                    count: 1,
                    price: room.price,
                }),
            }
        }
        summaries.sort_by_key(|s| s.room_type);
        summaries
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_room_is_available() {
        let room = Room::new(12, RoomType::TwoBedroom, 150.0).unwrap();
        assert!(room.is_available());
        assert!(!room.status.is_held());
        assert_eq!(room.room_type, RoomType::TwoBedroom);
    }

    #[test]
    fn rejects_non_positive_number_and_price() {
        assert!(matches!(
            Room::new(0, RoomType::Suite, 200.0),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            Room::new(5, RoomType::Suite, 0.0),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            Room::new(5, RoomType::Suite, f64::NAN),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn room_type_accepts_aliases() {
        assert_eq!("1bhk".parse::<RoomType>().unwrap(), RoomType::OneBedroom);
        assert_eq!(
            "2-bedroom".parse::<RoomType>().unwrap(),
            RoomType::TwoBedroom
        );
        assert_eq!("Suite".parse::<RoomType>().unwrap(), RoomType::Suite);
        assert!("penthouse".parse::<RoomType>().is_err());
    }

    #[test]
    fn status_parse_is_strict() {
        assert_eq!(
            "reserved".parse::<RoomStatus>().unwrap(),
            RoomStatus::Reserved
        );
        assert!("Reserved".parse::<RoomStatus>().is_err());
        assert!(RoomStatus::Booked.is_held());
    }

    #[test]
    fn summary_counts_available_rooms_per_type() {
        let mut rooms = vec![
            Room::new(1, RoomType::OneBedroom, 100.0).unwrap(),
            Room::new(2, RoomType::OneBedroom, 110.0).unwrap(),
            Room::new(21, RoomType::Suite, 200.0).unwrap(),
            Room::new(22, RoomType::Suite, 200.0).unwrap(),
        ];
        rooms[3].status = RoomStatus::Reserved;

        let summary = AvailabilitySummary::from_rooms(&rooms);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].room_type, RoomType::OneBedroom);
        assert_eq!(summary[0].count, 2);
        assert_eq!(summary[0].price, 100.0);
        assert_eq!(summary[1].room_type, RoomType::Suite);
        assert_eq!(summary[1].count, 1);
    }
}
