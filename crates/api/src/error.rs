use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use parkview_core::error::CoreError;
use parkview_core::parking::{ParkingError, SlotRejection};
use parkview_detector::DetectorError;
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`ParkingError`] for domain errors and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent JSON error envelopes of the form
/// `{ "error": ..., "code": ..., "details"?: ... }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A cross-cutting domain error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A named failure of the entry/exit/allocation/billing flow.
    #[error(transparent)]
    Parking(#[from] ParkingError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The external detector service failed or answered with an error.
    #[error("Detector error: {0}")]
    Detector(#[from] DetectorError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Parking(parking) => classify_parking_error(parking),
            AppError::Database(err) => classify_sqlx_error(err),

            AppError::Detector(err) => {
                tracing::error!(error = %err, "Detector call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "DETECTOR_ERROR",
                    err.to_string(),
                    None,
                )
            }

            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Map a [`CoreError`] to status, code, message, and optional details.
fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String, Option<Value>) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
            None,
        ),
        CoreError::Validation(msg) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
        }
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone(), None),
        CoreError::Unauthorized(msg) => {
            (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
        }
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone(), None),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
                None,
            )
        }
    }
}

/// Map a [`ParkingError`] to status, code, message, and optional
/// details. Each named error kind keeps a stable code so callers can
/// branch on it.
fn classify_parking_error(err: &ParkingError) -> (StatusCode, &'static str, String, Option<Value>) {
    match err {
        ParkingError::InvalidFlag { .. } => {
            (StatusCode::BAD_REQUEST, "INVALID_FLAG", err.to_string(), None)
        }
        ParkingError::MissingParkingLot => (
            StatusCode::BAD_REQUEST,
            "MISSING_PARKING_LOT",
            err.to_string(),
            None,
        ),
        ParkingError::DuplicateActiveSession { existing_session_id } => (
            StatusCode::CONFLICT,
            "DUPLICATE_ACTIVE_SESSION",
            err.to_string(),
            Some(json!({ "existing_session_id": existing_session_id })),
        ),
        ParkingError::SlotUnavailable {
            slot_id,
            lot_id,
            reason,
        } => {
            let status = match reason {
                SlotRejection::NotFound => StatusCode::NOT_FOUND,
                SlotRejection::WrongLot | SlotRejection::NotAvailable => StatusCode::CONFLICT,
            };
            (
                status,
                "SLOT_UNAVAILABLE",
                err.to_string(),
                Some(json!({
                    "slot_id": slot_id,
                    "parking_lot_id": lot_id,
                    "reason": reason,
                })),
            )
        }
        ParkingError::NoSlotAvailable { lot_id } => (
            StatusCode::NOT_FOUND,
            "NO_SLOT_AVAILABLE",
            err.to_string(),
            Some(json!({ "parking_lot_id": lot_id })),
        ),
        ParkingError::NoActiveSession { license_plate } => (
            StatusCode::NOT_FOUND,
            "NO_ACTIVE_SESSION",
            err.to_string(),
            Some(json!({ "license_plate": license_plate })),
        ),
        ParkingError::InvalidRate { .. } => {
            (StatusCode::BAD_REQUEST, "INVALID_RATE", err.to_string(), None)
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Violations of the active-session partial unique indexes map to
///   409 DUPLICATE_ACTIVE_SESSION (an entry race lost at the storage
///   layer).
/// - Other unique constraint violations (names starting with `uq_`)
///   map to 409 CONFLICT.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String, Option<Value>) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
            None,
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_parking_sessions_active") {
                    return (
                        StatusCode::CONFLICT,
                        "DUPLICATE_ACTIVE_SESSION",
                        "Vehicle already has an active parking session".to_string(),
                        None,
                    );
                }
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                        None,
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
                None,
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
                None,
            )
        }
    }
}
