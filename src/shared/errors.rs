use thiserror::Error;

/// Errors raised by the ledger, identity and persistence layers.
///
/// Everything except [`DomainError::Storage`] is a client-facing condition
/// that the HTTP layer reports with a descriptive message.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Room {0} is not available or already reserved")]
    RoomUnavailable(i32),

    #[error("Room number {0} already exists")]
    DuplicateRoomNumber(i32),

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Reservation {0} is already cancelled")]
    AlreadyCancelled(String),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn room_not_found(room_number: i32) -> Self {
        Self::NotFound {
            entity: "Room",
            field: "roomNumber",
            value: room_number.to_string(),
        }
    }

    pub fn reservation_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Reservation",
            field: "id",
            value: id.into(),
        }
    }

    /// Whether the caller caused this error (as opposed to a storage fault).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_helpers_name_the_entity() {
        let err = DomainError::reservation_not_found("abc");
        assert_eq!(err.to_string(), "Not found: Reservation with id=abc");

        let err = DomainError::room_not_found(7);
        assert_eq!(err.to_string(), "Not found: Room with roomNumber=7");
    }

    #[test]
    fn only_storage_errors_are_server_side() {
        assert!(DomainError::RoomUnavailable(1).is_client_error());
        assert!(DomainError::AlreadyCancelled("x".into()).is_client_error());
        assert!(DomainError::Validation("bad".into()).is_client_error());
        assert!(!DomainError::Storage("disk".into()).is_client_error());
    }
}
