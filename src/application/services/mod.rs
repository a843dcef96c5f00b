//! Application services

mod identity;
mod ledger;

pub use identity::{AuthResult, IdentityService};
pub use ledger::{ReservationLedger, ReserveRoom, ROOMS_PER_TYPE};
