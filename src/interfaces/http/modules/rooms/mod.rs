//! Room inventory: listing, availability, add and remove

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
