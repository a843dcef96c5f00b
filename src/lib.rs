//! # Hotel Reservations
//!
//! Reservation ledger for a hotel room inventory: rooms, bookings and
//! cancellations behind a JSON REST API.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Rooms, reservations, users and the repository traits
//! - **application**: The reservation ledger and identity services
//! - **infrastructure**: SeaORM persistence, in-memory storage, crypto
//! - **interfaces**: Axum HTTP router, handlers and middleware
//! - **server**: Process lifecycle (startup, seeding, graceful shutdown)

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;
