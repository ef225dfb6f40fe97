//! Handlers for the `/cameras` resource.
//!
//! Besides CRUD, cameras drive two vision flows: plate-based automatic
//! entry/exit (`process-vehicle`) and occupancy reconciliation from a
//! camera video (`detect-parking-space`).

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use base64::Engine;
use parkview_core::error::CoreError;
use parkview_core::parking::EntryFlag;
use parkview_core::status::{camera_status, camera_type};
use parkview_core::types::DbId;
use parkview_db::models::camera::{Camera, CreateCamera, UpdateCamera};
use parkview_db::repositories::{
    CameraRepo, ParkingSessionRepo, ParkingSlotRepo, VehicleRepo,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::detection::detection_response;
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::parking;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/cameras
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCamera>,
) -> AppResult<(StatusCode, Json<Camera>)> {
    validate_enums(input.camera_type.as_deref(), input.status.as_deref())?;
    let camera = CameraRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(camera)))
}

/// GET /api/v1/cameras
#[derive(Debug, Deserialize)]
pub struct CameraQuery {
    pub parking_lot_id: Option<DbId>,
}

pub async fn list(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    axum::extract::Query(params): axum::extract::Query<CameraQuery>,
) -> AppResult<Json<Vec<Camera>>> {
    let cameras = CameraRepo::list(&state.pool, params.parking_lot_id).await?;
    Ok(Json(cameras))
}

/// GET /api/v1/cameras/{id}
pub async fn get_by_id(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Camera>> {
    let camera = fetch_camera(&state, id).await?;
    Ok(Json(camera))
}

/// PUT /api/v1/cameras/{id}
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCamera>,
) -> AppResult<Json<Camera>> {
    validate_enums(input.camera_type.as_deref(), input.status.as_deref())?;
    let camera = CameraRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Camera",
            id,
        })?;
    Ok(Json(camera))
}

/// DELETE /api/v1/cameras/{id}
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = CameraRepo::delete(&state.pool, id).await?;
    if !removed {
        return Err(CoreError::NotFound {
            entity: "Camera",
            id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/cameras/{id}/stream
///
/// Stream descriptor for the frontend player.
pub async fn stream_info(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let camera = fetch_active_camera(&state, id).await?;

    Ok(Json(json!({
        "data": {
            "camera_id": camera.id,
            "camera_name": camera.name,
            "stream_url": camera.stream_url,
            "camera_type": camera.camera_type,
            "parking_lot_id": camera.parking_lot_id,
        }
    })))
}

// ---------------------------------------------------------------------------
// Vision flows
// ---------------------------------------------------------------------------

/// Request body for `POST /cameras/{id}/process-vehicle`.
///
/// Frame source priority: `image_url`, then `image_base64`, then the
/// camera's own HTTP snapshot stream.
#[derive(Debug, Deserialize)]
pub struct ProcessVehicleRequest {
    pub parking_lot_id: Option<DbId>,
    pub slot_id: Option<DbId>,
    pub image_url: Option<String>,
    pub image_base64: Option<String>,
}

/// POST /api/v1/cameras/{id}/process-vehicle
///
/// Detect a plate in a camera frame and automatically decide entry vs.
/// exit: a plate with an active session is leaving, anything else is
/// entering.
pub async fn process_vehicle(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ProcessVehicleRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let camera = fetch_active_camera(&state, id).await?;

    let lot_id = input.parking_lot_id.or(camera.parking_lot_id).ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "parking_lot_id is required: set it on the camera or pass it in the request".into(),
        ))
    })?;

    let frame = resolve_frame(&state, &camera, &input).await?;

    let detection = state
        .detector
        .detect_license_plate(frame, &format!("camera-{}-frame.jpg", camera.id))
        .await?;
    let Some(license_plate) = detection.license_plate else {
        return Err(AppError::Core(CoreError::Validation(
            "Could not detect a license plate in the camera frame".into(),
        )));
    };

    // Validate a suggested slot against the target lot up front, so a
    // stale detector suggestion fails loudly instead of allocating in
    // the wrong lot.
    if let Some(slot_id) = input.slot_id {
        let slot = ParkingSlotRepo::find_by_id(&state.pool, slot_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ParkingSlot",
                id: slot_id,
            })?;
        if slot.parking_lot_id != lot_id {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Slot {slot_id} does not belong to parking lot {lot_id}"
            ))));
        }
    }

    // Auto flag: an active session for this identity means the vehicle
    // is on its way out.
    let vehicle = VehicleRepo::find_by_plate(&state.pool, &license_plate).await?;
    let active = match &vehicle {
        Some(vehicle) => {
            ParkingSessionRepo::find_active_by_vehicle(&state.pool, vehicle.id).await?
        }
        None => ParkingSessionRepo::find_active_by_plate(&state.pool, &license_plate).await?,
    };
    let flag = if active.is_some() {
        EntryFlag::Exit
    } else {
        EntryFlag::Entry
    };

    let outcome =
        parking::handle_detection(&state, &license_plate, flag, Some(lot_id), input.slot_id)
            .await?;

    let mut body = detection_response(&license_plate, outcome);
    body["camera_id"] = json!(camera.id);
    body["flag"] = json!(flag.code());
    Ok(Json(body))
}

/// Request body for `POST /cameras/{id}/detect-parking-space`.
#[derive(Debug, Default, Deserialize)]
pub struct DetectParkingSpaceRequest {
    pub parking_lot_id: Option<DbId>,
}

/// POST /api/v1/cameras/{id}/detect-parking-space
///
/// Pull a video from the camera stream, ask the detector for a free-
/// slot recommendation, and reconcile slot occupancy from the detected
/// vehicle polygons. Reconciliation failures degrade to a warning; the
/// annotated image is still returned.
pub async fn detect_parking_space(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    input: Option<Json<DetectParkingSpaceRequest>>,
) -> AppResult<impl IntoResponse> {
    let camera = fetch_active_camera(&state, id).await?;
    let input = input.map(|Json(body)| body).unwrap_or_default();

    let lot_id = input.parking_lot_id.or(camera.parking_lot_id).ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "parking_lot_id is required: set it on the camera or pass it in the request".into(),
        ))
    })?;

    let video = fetch_stream_bytes(&state, &camera).await?;
    let file_name = format!("camera-{}-video.mp4", camera.id);

    let annotated = state
        .detector
        .recommend_space_video(video.clone(), &file_name, Some(lot_id))
        .await?;

    // Prefer polygons piggybacked on the recommendation response; fall
    // back to the dedicated detection endpoint.
    let vehicles = match annotated.vehicle_coordinates.clone() {
        Some(vehicles) => Ok(vehicles),
        None => state
            .detector
            .detect_vehicles(video, &file_name, Some(lot_id))
            .await
            .map(|detected| detected.into_iter().map(|v| v.coordinates).collect()),
    };

    match vehicles {
        Ok(vehicles) if !vehicles.is_empty() => {
            if let Err(err) = parking::reconcile::reconcile_lot(&state, lot_id, &vehicles).await {
                tracing::warn!(camera_id = camera.id, error = %err, "Occupancy reconciliation failed");
            }
        }
        Ok(_) => {}
        Err(err) => {
            tracing::warn!(camera_id = camera.id, error = %err, "Vehicle detection unavailable");
        }
    }

    Ok((
        [(header::CONTENT_TYPE, annotated.content_type)],
        annotated.bytes,
    ))
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

async fn fetch_camera(state: &AppState, id: DbId) -> AppResult<Camera> {
    CameraRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Camera",
                id,
            }
            .into()
        })
}

/// Load a camera and reject non-active ones.
async fn fetch_active_camera(state: &AppState, id: DbId) -> AppResult<Camera> {
    let camera = fetch_camera(state, id).await?;
    if camera.status != camera_status::ACTIVE {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Camera is not active (status: {})",
            camera.status
        ))));
    }
    Ok(camera)
}

/// Resolve the frame bytes for plate detection, in priority order:
/// explicit URL, base64 payload, camera snapshot stream.
async fn resolve_frame(
    state: &AppState,
    camera: &Camera,
    input: &ProcessVehicleRequest,
) -> AppResult<Vec<u8>> {
    if let Some(url) = input.image_url.as_deref() {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AppError::Core(CoreError::Validation(
                "image_url must be an HTTP(S) URL".into(),
            )));
        }
        return fetch_url_bytes(state, url).await;
    }

    if let Some(encoded) = input.image_base64.as_deref() {
        // Accept both raw base64 and data URLs.
        let payload = encoded.rsplit(',').next().unwrap_or(encoded);
        return base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| {
                AppError::Core(CoreError::Validation(format!(
                    "Invalid base64 image payload: {e}"
                )))
            });
    }

    fetch_stream_bytes(state, camera).await
}

/// Fetch a frame/video from the camera's stream URL. Only HTTP
/// snapshot cameras can be pulled server-side.
async fn fetch_stream_bytes(state: &AppState, camera: &Camera) -> AppResult<Vec<u8>> {
    if camera.camera_type != camera_type::HTTP && !camera.stream_url.starts_with("http") {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Camera type {} requires an HTTP snapshot URL or an explicit frame payload",
            camera.camera_type
        ))));
    }
    fetch_url_bytes(state, &camera.stream_url).await
}

async fn fetch_url_bytes(state: &AppState, url: &str) -> AppResult<Vec<u8>> {
    let response = state
        .http
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to fetch {url}: {e}")))?;
    if !response.status().is_success() {
        return Err(AppError::BadRequest(format!(
            "Fetching {url} returned status {}",
            response.status()
        )));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read {url}: {e}")))?;
    Ok(bytes.to_vec())
}

fn validate_enums(kind: Option<&str>, status: Option<&str>) -> Result<(), AppError> {
    if let Some(kind) = kind {
        if !camera_type::ALL.contains(&kind) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown camera type: {kind}"
            ))));
        }
    }
    if let Some(status) = status {
        if !camera_status::ALL.contains(&status) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown camera status: {status}"
            ))));
        }
    }
    Ok(())
}
