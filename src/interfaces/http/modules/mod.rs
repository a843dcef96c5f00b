pub mod auth;
pub mod health;
pub mod metrics;
pub mod reservations;
pub mod rooms;
