//! Repository traits for the domain layer
//!
//! `RepositoryProvider` gives unified access to the per-aggregate
//! repositories; consumers request only the one they need:
//!
//! ```ignore
//! async fn handle(repos: &dyn RepositoryProvider) {
//!     let room = repos.rooms().find_by_number(12).await?;
//!     let active = repos.reservations().find_active_for_room(12).await?;
//! }
//! ```

use super::reservation::ReservationRepository;
use super::room::RoomRepository;
use super::user::UserRepository;

pub trait RepositoryProvider: Send + Sync {
    fn rooms(&self) -> &dyn RoomRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn users(&self) -> &dyn UserRepository;
}
