//! Handlers for the `/parking-lots` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use parkview_core::error::CoreError;
use parkview_core::types::DbId;
use parkview_db::models::parking_lot::{CreateParkingLot, ParkingLot, UpdateParkingLot};
use parkview_db::repositories::ParkingLotRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// POST /api/v1/parking-lots
///
/// The hourly rate must be positive: the fee calculator refuses
/// non-positive rates at exit time, so reject them at the door.
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateParkingLot>,
) -> AppResult<(StatusCode, Json<ParkingLot>)> {
    if input.price_per_hour <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "price_per_hour must be positive".into(),
        )));
    }
    let lot = ParkingLotRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(lot)))
}

/// GET /api/v1/parking-lots
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ParkingLot>>> {
    let lots = ParkingLotRepo::list(&state.pool).await?;
    Ok(Json(lots))
}

/// GET /api/v1/parking-lots/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ParkingLot>> {
    let lot = ParkingLotRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ParkingLot",
            id,
        })?;
    Ok(Json(lot))
}

/// GET /api/v1/parking-lots/{id}/availability
///
/// Per-status slot counts, for dashboards and the mobile client.
pub async fn availability(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    ParkingLotRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ParkingLot",
            id,
        })?;

    let counts = ParkingLotRepo::availability(&state.pool, id).await?;
    Ok(Json(serde_json::json!({
        "data": {
            "parking_lot_id": id,
            "counts": counts,
        }
    })))
}

/// PUT /api/v1/parking-lots/{id}
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateParkingLot>,
) -> AppResult<Json<ParkingLot>> {
    if matches!(input.price_per_hour, Some(rate) if rate <= 0) {
        return Err(AppError::Core(CoreError::Validation(
            "price_per_hour must be positive".into(),
        )));
    }
    let lot = ParkingLotRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ParkingLot",
            id,
        })?;
    Ok(Json(lot))
}

/// DELETE /api/v1/parking-lots/{id}
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = ParkingLotRepo::delete(&state.pool, id).await?;
    if !removed {
        return Err(CoreError::NotFound {
            entity: "ParkingLot",
            id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}
