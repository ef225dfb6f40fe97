//! Handlers for the `/parking-slots` resource and the nested
//! `/parking-lots/{lot_id}/slots` listing.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use parkview_core::error::CoreError;
use parkview_core::status::SlotStatus;
use parkview_core::types::DbId;
use parkview_db::models::parking_slot::{CreateParkingSlot, ParkingSlot, UpdateParkingSlot};
use parkview_db::repositories::{ParkingLotRepo, ParkingSlotRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Query parameters for slot listing.
#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub status: Option<String>,
}

/// POST /api/v1/parking-slots
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateParkingSlot>,
) -> AppResult<(StatusCode, Json<ParkingSlot>)> {
    if let Some(status) = input.status.as_deref() {
        validate_status(status)?;
    }
    ParkingLotRepo::find_by_id(&state.pool, input.parking_lot_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ParkingLot",
            id: input.parking_lot_id,
        })?;

    let slot = ParkingSlotRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

/// GET /api/v1/parking-lots/{lot_id}/slots
pub async fn list_by_lot(
    State(state): State<AppState>,
    Path(lot_id): Path<DbId>,
    Query(params): Query<SlotQuery>,
) -> AppResult<Json<Vec<ParkingSlot>>> {
    if let Some(status) = params.status.as_deref() {
        validate_status(status)?;
    }
    ParkingLotRepo::find_by_id(&state.pool, lot_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ParkingLot",
            id: lot_id,
        })?;

    let slots = ParkingSlotRepo::list_by_lot(&state.pool, lot_id, params.status.as_deref()).await?;
    Ok(Json(slots))
}

/// GET /api/v1/parking-slots/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ParkingSlot>> {
    let slot = ParkingSlotRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ParkingSlot",
            id,
        })?;
    Ok(Json(slot))
}

/// PUT /api/v1/parking-slots/{id}
///
/// Admin maintenance path: slot code, manual status overrides
/// (e.g. out_of_service), and footprint calibration.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateParkingSlot>,
) -> AppResult<Json<ParkingSlot>> {
    if let Some(status) = input.status.as_deref() {
        validate_status(status)?;
    }
    let slot = ParkingSlotRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ParkingSlot",
            id,
        })?;
    Ok(Json(slot))
}

/// DELETE /api/v1/parking-slots/{id}
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = ParkingSlotRepo::delete(&state.pool, id).await?;
    if !removed {
        return Err(CoreError::NotFound {
            entity: "ParkingSlot",
            id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}

fn validate_status(status: &str) -> Result<(), AppError> {
    if SlotStatus::parse(status).is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown slot status: {status}"
        ))));
    }
    Ok(())
}
