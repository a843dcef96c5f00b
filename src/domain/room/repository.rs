//! Room repository interface

use async_trait::async_trait;

use super::model::{Room, RoomStatus};
use crate::shared::DomainResult;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Insert a new room. Fails with `DuplicateRoomNumber` if the number is taken.
    async fn insert(&self, room: Room) -> DomainResult<()>;

    /// Find room by its number
    async fn find_by_number(&self, room_number: i32) -> DomainResult<Option<Room>>;

    /// All rooms, ordered by number
    async fn find_all(&self) -> DomainResult<Vec<Room>>;

    /// Rooms in the given status, ordered by number
    async fn find_by_status(&self, status: RoomStatus) -> DomainResult<Vec<Room>>;

    /// Number of rooms in the inventory
    async fn count(&self) -> DomainResult<u64>;

    /// Delete a room that is currently available.
    ///
    /// Fails with `NotFound` if the room does not exist and with
    /// `RoomUnavailable` if an active reservation holds it.
    async fn delete_available(&self, room_number: i32) -> DomainResult<Room>;
}
