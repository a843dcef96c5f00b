//! Reservation domain entity

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use crate::shared::DomainError;

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    /// Active reservation holding its room
    Booked,
    /// Terminal: cancelled by the guest or staff
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Booked => "booked",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for ReservationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "booked" => Ok(Self::Booked),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(DomainError::Validation(format!(
                "unknown reservation status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A guest's claim on a room for a date range
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    /// Unique reservation ID (UUID v4)
    pub id: String,
    pub customer_name: String,
    /// Room this reservation holds
    pub room_number: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Reservation {
    /// Build a new active reservation with a fresh ID.
    pub fn new(
        room_number: i32,
        customer_name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, DomainError> {
        let customer_name = customer_name.into().trim().to_string();
        if customer_name.is_empty() {
            return Err(DomainError::Validation("customerName is required".into()));
        }
        if room_number < 1 {
            return Err(DomainError::Validation(
                "roomNumber must be a positive integer".into(),
            ));
        }
        if end_date <= start_date {
            return Err(DomainError::Validation(
                "endDate must be after startDate".into(),
            ));
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            customer_name,
            room_number,
            start_date,
            end_date,
            status: ReservationStatus::Booked,
            created_at: Utc::now(),
            cancelled_at: None,
        })
    }

    /// Check if this reservation still holds its room
    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Booked
    }

    /// Cancel this reservation. Cancellation is terminal and not repeatable.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        if self.status == ReservationStatus::Cancelled {
            return Err(DomainError::AlreadyCancelled(self.id.clone()));
        }
        self.status = ReservationStatus::Cancelled;
        self.cancelled_at = Some(Utc::now());
        Ok(())
    }

    /// Number of nights covered by the stay
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_reservation() -> Reservation {
        Reservation::new(1, "Alice", date(2024, 1, 1), date(2024, 1, 5)).unwrap()
    }

    #[test]
    fn new_reservation_is_active() {
        let r = sample_reservation();
        assert!(r.is_active());
        assert_eq!(r.status, ReservationStatus::Booked);
        assert_eq!(r.nights(), 4);
        assert!(r.cancelled_at.is_none());
        assert!(uuid::Uuid::parse_str(&r.id).is_ok());
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(sample_reservation().id, sample_reservation().id);
    }

    #[test]
    fn cancel_is_terminal() {
        let mut r = sample_reservation();
        r.cancel().unwrap();
        assert_eq!(r.status, ReservationStatus::Cancelled);
        assert!(r.cancelled_at.is_some());
        assert!(!r.is_active());

        let err = r.cancel().unwrap_err();
        assert!(matches!(err, DomainError::AlreadyCancelled(id) if id == r.id));
    }

    #[test]
    fn rejects_blank_customer_name() {
        let err = Reservation::new(1, "   ", date(2024, 1, 1), date(2024, 1, 2)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rejects_inverted_or_empty_date_range() {
        assert!(Reservation::new(1, "Bob", date(2024, 1, 5), date(2024, 1, 1)).is_err());
        assert!(Reservation::new(1, "Bob", date(2024, 1, 5), date(2024, 1, 5)).is_err());
    }

    #[test]
    fn customer_name_is_trimmed() {
        let r = Reservation::new(3, "  Carol ", date(2024, 2, 1), date(2024, 2, 2)).unwrap();
        assert_eq!(r.customer_name, "Carol");
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("Accepted".parse::<ReservationStatus>().is_err());
        assert_eq!(
            "cancelled".parse::<ReservationStatus>().unwrap(),
            ReservationStatus::Cancelled
        );
    }
}
