//! Handlers for the `/parking-sessions` resource.
//!
//! Sessions are created and completed exclusively by the detection
//! state machine; this resource is the staff-facing read surface plus
//! the admin-only direct edit (the sole path to `cancelled`).

use axum::extract::{Path, Query, State};
use axum::Json;
use parkview_core::error::CoreError;
use parkview_core::status::SessionStatus;
use parkview_core::types::DbId;
use parkview_db::models::parking_session::{
    ParkingSession, SessionFilter, UpdateParkingSession,
};
use parkview_db::repositories::{ParkingSessionRepo, ParkingSlotRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::state::AppState;

/// GET /api/v1/parking-sessions
pub async fn list(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Query(filter): Query<SessionFilter>,
) -> AppResult<Json<Vec<ParkingSession>>> {
    if let Some(status) = filter.status.as_deref() {
        validate_status(status)?;
    }
    let sessions = ParkingSessionRepo::list(&state.pool, &filter).await?;
    Ok(Json(sessions))
}

/// GET /api/v1/parking-sessions/{id}
pub async fn get_by_id(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ParkingSession>> {
    let session = ParkingSessionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ParkingSession",
            id,
        })?;
    Ok(Json(session))
}

/// PUT /api/v1/parking-sessions/{id}
///
/// Admin-only direct edit. Cancelling an active session also releases
/// its slot.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateParkingSession>,
) -> AppResult<Json<ParkingSession>> {
    let Some(status) = input.status.as_deref() else {
        return Err(AppError::Core(CoreError::Validation(
            "No fields to update".into(),
        )));
    };
    let status = SessionStatus::parse(status).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Unknown session status: {status}"
        )))
    })?;

    let current = ParkingSessionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ParkingSession",
            id,
        })?;
    let was_active = current.status == SessionStatus::Active.as_str();

    let session = ParkingSessionRepo::update_status(&state.pool, id, status)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ParkingSession",
            id,
        })?;

    // An admin cancelling an active session vacates the slot.
    if was_active && status == SessionStatus::Cancelled {
        let mut conn = state.pool.acquire().await?;
        ParkingSlotRepo::release(&mut conn, session.parking_slot_id).await?;
    }

    Ok(Json(session))
}

fn validate_status(status: &str) -> Result<(), AppError> {
    if SessionStatus::parse(status).is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown session status: {status}"
        ))));
    }
    Ok(())
}
