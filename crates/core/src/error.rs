use crate::types::DbId;

/// Generic application error vocabulary shared by all layers.
///
/// Domain-specific failures of the entry/exit flow live in
/// [`crate::parking::ParkingError`]; this enum covers the cross-cutting
/// cases (missing entities, validation, authorization).
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
