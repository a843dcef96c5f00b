//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error mapping, validated JSON extractor
//! - `middleware`: optional JWT authentication gate
//! - `modules`: handlers and DTOs per resource
//! - `router`: route table and layers

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, RouterDeps};
