pub mod repositories;
pub mod reservation;
pub mod room;
pub mod user;

// Re-export commonly used types
pub use repositories::RepositoryProvider;
pub use reservation::{Reservation, ReservationRepository, ReservationStatus};
pub use room::{AvailabilitySummary, Room, RoomRepository, RoomStatus, RoomType};
pub use user::{User, UserRepository};

pub use crate::shared::errors::{DomainError, DomainResult};
