//! Reservation ledger: the application service that owns rooms and
//! reservations.
//!
//! HTTP handlers are thin wrappers that delegate here. Every state change
//! goes through the repositories' atomic `reserve`/`cancel`, so the ledger
//! itself holds no locks.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::{
    AvailabilitySummary, DomainError, DomainResult, RepositoryProvider, Reservation,
    ReservationStatus, Room, RoomStatus, RoomType,
};

/// Rooms created per type when seeding an empty inventory
pub const ROOMS_PER_TYPE: i32 = 10;

/// Input for [`ReservationLedger::reserve`]
#[derive(Debug, Clone)]
pub struct ReserveRoom {
    pub room_number: i32,
    pub customer_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub struct ReservationLedger {
    repos: Arc<dyn RepositoryProvider>,
}

impl ReservationLedger {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    // ── Inventory ───────────────────────────────────────────────

    /// Seed 10 rooms of each type into an empty inventory.
    ///
    /// Returns the number of rooms created: 0 when rooms already exist.
    /// Numbers another seeder inserted first are skipped.
    pub async fn initialize_inventory(&self) -> DomainResult<usize> {
        let existing = self.repos.rooms().count().await?;
        if existing > 0 {
            info!(rooms = existing, "Inventory already initialized");
            return Ok(0);
        }

        let mut created = 0;
        for (type_index, room_type) in RoomType::ALL.iter().enumerate() {
            for i in 0..ROOMS_PER_TYPE {
                let room_number = i + 1 + type_index as i32 * ROOMS_PER_TYPE;
                let room = Room::new(room_number, *room_type, room_type.default_price())?;
                match self.repos.rooms().insert(room).await {
                    Ok(()) => created += 1,
                    Err(DomainError::DuplicateRoomNumber(n)) => {
                        warn!(room_number = n, "Room already seeded, skipping");
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        info!(created, "Room inventory initialized");
        Ok(created)
    }

    pub async fn add_room(
        &self,
        room_number: i32,
        room_type: RoomType,
        price: f64,
    ) -> DomainResult<Room> {
        let room = Room::new(room_number, room_type, price)?;
        self.repos.rooms().insert(room.clone()).await?;

        metrics::counter!("rooms_added_total").increment(1);
        info!(room_number, room_type = %room_type, price, "Room added");
        Ok(room)
    }

    /// Delete a room that no active reservation holds.
    pub async fn remove_room(&self, room_number: i32) -> DomainResult<Room> {
        if let Some(active) = self
            .repos
            .reservations()
            .find_active_for_room(room_number)
            .await?
        {
            warn!(
                room_number,
                reservation_id = %active.id,
                "Room removal rejected, active reservation"
            );
            return Err(DomainError::RoomUnavailable(room_number));
        }

        let room = self.repos.rooms().delete_available(room_number).await?;
        info!(room_number, "Room removed");
        Ok(room)
    }

    pub async fn get_room(&self, room_number: i32) -> DomainResult<Room> {
        self.repos
            .rooms()
            .find_by_number(room_number)
            .await?
            .ok_or_else(|| DomainError::room_not_found(room_number))
    }

    pub async fn list_rooms(&self) -> DomainResult<Vec<Room>> {
        self.repos.rooms().find_all().await
    }

    /// Available rooms ordered by number
    pub async fn list_available(&self) -> DomainResult<Vec<Room>> {
        self.repos
            .rooms()
            .find_by_status(RoomStatus::Available)
            .await
    }

    /// Available rooms aggregated by type
    pub async fn available_summary(&self) -> DomainResult<Vec<AvailabilitySummary>> {
        let rooms = self.list_available().await?;
        Ok(AvailabilitySummary::from_rooms(&rooms))
    }

    // ── Reservations ────────────────────────────────────────────

    pub async fn reserve(&self, input: ReserveRoom) -> DomainResult<Reservation> {
        let reservation = Reservation::new(
            input.room_number,
            input.customer_name,
            input.start_date,
            input.end_date,
        )?;

        match self.repos.reservations().reserve(reservation).await {
            Ok(reservation) => {
                metrics::counter!("reservations_created_total").increment(1);
                info!(
                    reservation_id = %reservation.id,
                    room_number = reservation.room_number,
                    "Room reserved"
                );
                Ok(reservation)
            }
            Err(DomainError::RoomUnavailable(n)) => {
                metrics::counter!("reservation_conflicts_total").increment(1);
                warn!(room_number = n, "Reservation rejected, room unavailable");
                Err(DomainError::RoomUnavailable(n))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn cancel(&self, reservation_id: &str) -> DomainResult<Reservation> {
        let reservation = self.repos.reservations().cancel(reservation_id).await?;

        metrics::counter!("reservations_cancelled_total").increment(1);
        info!(
            reservation_id = %reservation.id,
            room_number = reservation.room_number,
            "Reservation cancelled"
        );
        Ok(reservation)
    }

    pub async fn get_reservation(&self, reservation_id: &str) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| DomainError::reservation_not_found(reservation_id))
    }

    /// Active reservations, oldest first
    pub async fn list_booked(&self) -> DomainResult<Vec<Reservation>> {
        self.repos
            .reservations()
            .find_by_status(ReservationStatus::Booked)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_connection;
    use crate::infrastructure::{InMemoryRepositoryProvider, SeaOrmRepositoryProvider};

    fn memory_ledger() -> ReservationLedger {
        ReservationLedger::new(Arc::new(InMemoryRepositoryProvider::new()))
    }

    async fn sqlite_ledger() -> ReservationLedger {
        ReservationLedger::new(Arc::new(SeaOrmRepositoryProvider::new(
            test_connection().await,
        )))
    }

    fn request(room_number: i32, name: &str) -> ReserveRoom {
        ReserveRoom {
            room_number,
            customer_name: name.to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        }
    }

    /// Every room is available exactly when no booked reservation holds it.
    async fn assert_ledger_consistent(ledger: &ReservationLedger) {
        let booked = ledger.list_booked().await.unwrap();
        for room in ledger.list_rooms().await.unwrap() {
            let held = booked.iter().any(|r| r.room_number == room.room_number);
            assert_eq!(room.is_available(), !held, "room {}", room.room_number);

            let active = ledger
                .repos
                .reservations()
                .find_active_for_room(room.room_number)
                .await
                .unwrap();
            assert_eq!(active.is_some(), held, "room {}", room.room_number);
        }
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let ledger = sqlite_ledger().await;
        assert_eq!(ledger.initialize_inventory().await.unwrap(), 30);
        assert_eq!(ledger.initialize_inventory().await.unwrap(), 0);

        let rooms = ledger.list_rooms().await.unwrap();
        assert_eq!(rooms.len(), 30);
        assert_eq!(rooms[0].room_type, RoomType::OneBedroom);
        assert_eq!(rooms[10].room_number, 11);
        assert_eq!(rooms[10].room_type, RoomType::TwoBedroom);
        assert_eq!(rooms[29].room_type, RoomType::Suite);
        assert_eq!(rooms[29].price, 200.0);
    }

    #[tokio::test]
    async fn summary_groups_available_rooms() {
        let ledger = memory_ledger();
        ledger.initialize_inventory().await.unwrap();
        ledger.reserve(request(1, "Alice")).await.unwrap();

        let summary = ledger.available_summary().await.unwrap();
        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0].room_type, RoomType::OneBedroom);
        assert_eq!(summary[0].count, 9);
        assert_eq!(summary[0].price, 100.0);
        assert_eq!(summary[2].count, 10);
    }

    #[tokio::test]
    async fn reserve_cancel_scenario() {
        let ledger = sqlite_ledger().await;
        ledger.initialize_inventory().await.unwrap();

        let r = ledger.reserve(request(1, "Alice")).await.unwrap();
        assert_eq!(
            ledger.get_room(1).await.unwrap().status,
            RoomStatus::Reserved
        );
        assert!(matches!(
            ledger.reserve(request(1, "Bob")).await,
            Err(DomainError::RoomUnavailable(1))
        ));
        assert_ledger_consistent(&ledger).await;

        ledger.cancel(&r.id).await.unwrap();
        assert!(ledger.get_room(1).await.unwrap().is_available());
        assert!(matches!(
            ledger.cancel(&r.id).await,
            Err(DomainError::AlreadyCancelled(_))
        ));

        let stored = ledger.get_reservation(&r.id).await.unwrap();
        assert_eq!(stored.status, ReservationStatus::Cancelled);
        assert!(ledger.list_booked().await.unwrap().is_empty());
        assert_ledger_consistent(&ledger).await;
    }

    #[tokio::test]
    async fn invalid_requests_are_rejected_before_storage() {
        let ledger = memory_ledger();
        ledger.initialize_inventory().await.unwrap();

        let mut bad_dates = request(2, "Alice");
        bad_dates.end_date = bad_dates.start_date;
        assert!(matches!(
            ledger.reserve(bad_dates).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            ledger.reserve(request(2, "")).await,
            Err(DomainError::Validation(_))
        ));
        assert!(ledger.list_booked().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_room_rejects_duplicates() {
        let ledger = memory_ledger();
        ledger.initialize_inventory().await.unwrap();

        assert!(matches!(
            ledger.add_room(1, RoomType::Suite, 500.0).await,
            Err(DomainError::DuplicateRoomNumber(1))
        ));
        let added = ledger.add_room(31, RoomType::Suite, 500.0).await.unwrap();
        assert!(added.is_available());
        assert_eq!(ledger.list_rooms().await.unwrap().len(), 31);
        assert_eq!(ledger.get_room(1).await.unwrap().price, 100.0);
    }

    #[tokio::test]
    async fn remove_room_only_when_free() {
        let ledger = memory_ledger();
        ledger.initialize_inventory().await.unwrap();
        let r = ledger.reserve(request(5, "Alice")).await.unwrap();

        assert!(matches!(
            ledger.remove_room(5).await,
            Err(DomainError::RoomUnavailable(5))
        ));
        ledger.cancel(&r.id).await.unwrap();
        ledger.remove_room(5).await.unwrap();
        assert!(matches!(
            ledger.get_room(5).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn remove_room_blocked_by_active_reservation() {
        let ledger = sqlite_ledger().await;
        ledger.initialize_inventory().await.unwrap();
        let r = ledger.reserve(request(7, "Alice")).await.unwrap();

        assert!(matches!(
            ledger.remove_room(7).await,
            Err(DomainError::RoomUnavailable(7))
        ));
        assert_eq!(
            ledger.get_room(7).await.unwrap().status,
            RoomStatus::Reserved
        );
        assert_eq!(ledger.get_reservation(&r.id).await.unwrap().room_number, 7);
        assert_ledger_consistent(&ledger).await;

        ledger.cancel(&r.id).await.unwrap();
        ledger.remove_room(7).await.unwrap();
        assert_eq!(ledger.list_rooms().await.unwrap().len(), 29);
        assert_ledger_consistent(&ledger).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reserves_on_one_room() {
        let ledger = Arc::new(sqlite_ledger().await);
        ledger.initialize_inventory().await.unwrap();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let ledger = ledger.clone();
                tokio::spawn(async move {
                    ledger.reserve(request(1, &format!("Guest {}", i))).await
                })
            })
            .collect();

        let mut wins = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => wins += 1,
                Err(DomainError::RoomUnavailable(1)) => conflicts += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
        assert_eq!((wins, conflicts), (1, 9));
        assert_ledger_consistent(&ledger).await;
    }

    #[tokio::test]
    async fn unknown_reservation_is_not_found() {
        let ledger = memory_ledger();
        assert!(matches!(
            ledger.cancel("missing").await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            ledger.get_reservation("missing").await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
