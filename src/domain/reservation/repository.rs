//! Reservation repository interface

use async_trait::async_trait;

use super::model::{Reservation, ReservationStatus};
use crate::shared::DomainResult;

/// Reservation ledger storage.
///
/// `reserve` and `cancel` touch both the reservation and the room it holds;
/// implementations commit both writes atomically and guard each status
/// transition on the expected prior status.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Claim the room (`available -> reserved`) and store the reservation.
    ///
    /// Fails with `RoomUnavailable` when the room is missing or not available;
    /// nothing is written in that case.
    async fn reserve(&self, reservation: Reservation) -> DomainResult<Reservation>;

    /// Cancel an active reservation (`booked -> cancelled`) and release its
    /// room back to `available`.
    ///
    /// Fails with `NotFound` for an unknown ID and `AlreadyCancelled` when the
    /// reservation was cancelled before.
    async fn cancel(&self, id: &str) -> DomainResult<Reservation>;

    /// Find reservation by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>>;

    /// Reservations in the given status, oldest first
    async fn find_by_status(&self, status: ReservationStatus) -> DomainResult<Vec<Reservation>>;

    /// Active reservation holding a room, if any
    async fn find_active_for_room(&self, room_number: i32) -> DomainResult<Option<Reservation>>;
}
