//! In-memory storage implementation
//!
//! Rooms and reservations share one lock so that reserve and cancel update
//! both tables as a single step. Users live in a separate `DashMap`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use log::{debug, warn};
use tokio::sync::Mutex;

use crate::domain::{
    DomainError, DomainResult, RepositoryProvider, Reservation, ReservationRepository,
    ReservationStatus, Room, RoomRepository, RoomStatus, User, UserRepository,
};

#[derive(Default)]
struct Ledger {
    rooms: BTreeMap<i32, Room>,
    reservations: HashMap<String, Reservation>,
}

/// Room repository over the shared ledger
pub struct InMemoryRoomRepository {
    ledger: Arc<Mutex<Ledger>>,
}

/// Reservation repository over the shared ledger
pub struct InMemoryReservationRepository {
    ledger: Arc<Mutex<Ledger>>,
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
}

/// In-memory storage for development and testing
pub struct InMemoryRepositoryProvider {
    rooms: InMemoryRoomRepository,
    reservations: InMemoryReservationRepository,
    users: InMemoryUserRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        let ledger = Arc::new(Mutex::new(Ledger::default()));
        Self {
            rooms: InMemoryRoomRepository {
                ledger: ledger.clone(),
            },
            reservations: InMemoryReservationRepository { ledger },
            users: InMemoryUserRepository::default(),
        }
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn rooms(&self) -> &dyn RoomRepository {
        &self.rooms
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn insert(&self, room: Room) -> DomainResult<()> {
        let mut ledger = self.ledger.lock().await;
        if ledger.rooms.contains_key(&room.room_number) {
            return Err(DomainError::DuplicateRoomNumber(room.room_number));
        }
        ledger.rooms.insert(room.room_number, room);
        Ok(())
    }

    async fn find_by_number(&self, room_number: i32) -> DomainResult<Option<Room>> {
        Ok(self.ledger.lock().await.rooms.get(&room_number).cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<Room>> {
        Ok(self.ledger.lock().await.rooms.values().cloned().collect())
    }

    async fn find_by_status(&self, status: RoomStatus) -> DomainResult<Vec<Room>> {
        let ledger = self.ledger.lock().await;
        Ok(ledger
            .rooms
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.ledger.lock().await.rooms.len() as u64)
    }

    async fn delete_available(&self, room_number: i32) -> DomainResult<Room> {
        let mut ledger = self.ledger.lock().await;
        match ledger.rooms.get(&room_number) {
            None => Err(DomainError::room_not_found(room_number)),
            Some(room) if !room.is_available() => Err(DomainError::RoomUnavailable(room_number)),
            Some(_) => ledger
                .rooms
                .remove(&room_number)
                .ok_or_else(|| DomainError::room_not_found(room_number)),
        }
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn reserve(&self, reservation: Reservation) -> DomainResult<Reservation> {
        debug!(
            "Reserving room {} for reservation {}",
            reservation.room_number, reservation.id
        );

        let mut ledger = self.ledger.lock().await;
        match ledger.rooms.get_mut(&reservation.room_number) {
            Some(room) if room.is_available() => room.status = RoomStatus::Reserved,
            _ => return Err(DomainError::RoomUnavailable(reservation.room_number)),
        }
        ledger
            .reservations
            .insert(reservation.id.clone(), reservation.clone());
        Ok(reservation)
    }

    async fn cancel(&self, id: &str) -> DomainResult<Reservation> {
        debug!("Cancelling reservation: {}", id);

        let mut ledger = self.ledger.lock().await;
        let reservation = ledger
            .reservations
            .get_mut(id)
            .ok_or_else(|| DomainError::reservation_not_found(id))?;
        reservation.cancel()?;
        let cancelled = reservation.clone();

        match ledger.rooms.get_mut(&cancelled.room_number) {
            Some(room) if room.status.is_held() => room.status = RoomStatus::Available,
            _ => warn!(
                "Reservation {} cancelled but room {} was not held",
                id, cancelled.room_number
            ),
        }
        Ok(cancelled)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        Ok(self.ledger.lock().await.reservations.get(id).cloned())
    }

    async fn find_by_status(&self, status: ReservationStatus) -> DomainResult<Vec<Reservation>> {
        let ledger = self.ledger.lock().await;
        let mut found: Vec<Reservation> = ledger
            .reservations
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect();
        found.sort_by_key(|r| (r.created_at, r.id.clone()));
        Ok(found)
    }

    async fn find_active_for_room(&self, room_number: i32) -> DomainResult<Option<Reservation>> {
        let ledger = self.ledger.lock().await;
        Ok(ledger
            .reservations
            .values()
            .find(|r| r.room_number == room_number && r.is_active())
            .cloned())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> DomainResult<()> {
        match self.users.entry(user.username.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(DomainError::Conflict(format!(
                "Username '{}' already exists",
                user.username
            ))),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(user);
                Ok(())
            }
        }
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(username).map(|u| u.value().clone()))
    }
}
