//! Shared HTTP building blocks

pub mod error;
pub mod response;
pub mod validated_json;

pub use error::{parse_room_number, ApiError, ApiResult, CreatedResult};
pub use response::ApiResponse;
pub use validated_json::ValidatedJson;
