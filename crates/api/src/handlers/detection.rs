//! Handlers for the `/detections` webhook surface.
//!
//! The external detector posts here after recognizing a plate (entry/
//! exit decisions) or a set of vehicle polygons (occupancy). Like the
//! rest of the machine-to-machine surface, these endpoints are not
//! behind user authentication.

use axum::extract::State;
use axum::Json;
use parkview_core::error::CoreError;
use parkview_core::geometry::Polygon;
use parkview_core::parking::EntryFlag;
use parkview_core::types::DbId;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::parking::{self, DetectionOutcome, EntryOutcome, ExitOutcome};
use crate::state::AppState;

/// Request body for `POST /detections`.
#[derive(Debug, Deserialize)]
pub struct DetectionRequest {
    pub license_plate: String,
    /// 0 = entry, 1 = exit (the detector's wire convention).
    pub flag: i32,
    pub parking_lot_id: Option<DbId>,
    /// Slot the detector believes the vehicle is heading for.
    pub slot_id: Option<DbId>,
}

/// Request body for `POST /detections/occupancy`.
#[derive(Debug, Deserialize)]
pub struct OccupancyRequest {
    pub parking_lot_id: DbId,
    /// One polygon per detected vehicle, in the slot coordinate space.
    pub vehicles: Vec<Polygon>,
}

/// POST /api/v1/detections
///
/// Entry/exit webhook: decides open-vs-close for the detected plate and
/// returns the resulting session.
pub async fn handle_detection(
    State(state): State<AppState>,
    Json(input): Json<DetectionRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let license_plate = input.license_plate.trim();
    if license_plate.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "License plate is required".into(),
        )));
    }
    let flag = EntryFlag::from_code(input.flag)?;

    let outcome = parking::handle_detection(
        &state,
        license_plate,
        flag,
        input.parking_lot_id,
        input.slot_id,
    )
    .await?;

    Ok(Json(detection_response(license_plate, outcome)))
}

/// POST /api/v1/detections/occupancy
///
/// Occupancy webhook: reconciles slot statuses of one lot against the
/// detected vehicle polygons.
pub async fn reconcile_occupancy(
    State(state): State<AppState>,
    Json(input): Json<OccupancyRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let summary =
        parking::reconcile::reconcile_lot(&state, input.parking_lot_id, &input.vehicles).await?;
    Ok(Json(json!({ "data": summary })))
}

/// Build the webhook response body for a handled detection.
pub fn detection_response(license_plate: &str, outcome: DetectionOutcome) -> serde_json::Value {
    match outcome {
        DetectionOutcome::Entry(entry) => entry_response(license_plate, entry),
        DetectionOutcome::Exit(exit) => exit_response(license_plate, exit),
    }
}

fn entry_response(license_plate: &str, outcome: EntryOutcome) -> serde_json::Value {
    let message = if outcome.vehicle.is_some() {
        "Vehicle entry processed successfully"
    } else {
        "Vehicle entry processed - walk-up vehicle, billed by plate on exit"
    };

    json!({
        "message": message,
        "is_registered": outcome.vehicle.is_some(),
        "license_plate": license_plate,
        "parking_session": outcome.session,
        "slot": {
            "id": outcome.slot.id,
            "slot_code": outcome.slot.slot_code,
            "parking_lot_id": outcome.slot.parking_lot_id,
        },
        "vehicle": outcome.vehicle,
        "notification_sent": outcome.notification_sent,
    })
}

fn exit_response(license_plate: &str, outcome: ExitOutcome) -> serde_json::Value {
    json!({
        "message": "Vehicle exit processed successfully",
        "is_registered": outcome.vehicle.is_some(),
        "license_plate": license_plate,
        "parking_session": outcome.session,
        "slot_code": outcome.slot_code,
        "fee_details": {
            "entry_time": outcome.session.entry_time,
            "exit_time": outcome.session.exit_time,
            "duration_hours": outcome.fee.duration_hours,
            "price_per_hour": outcome.fee.hourly_rate,
            "breakdown": outcome.fee.breakdown,
            "total_fee": outcome.fee.total_fee,
        },
        "vehicle": outcome.vehicle,
        "notification_sent": outcome.notification_sent,
    })
}
