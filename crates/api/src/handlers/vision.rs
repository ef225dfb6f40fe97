//! Handlers for the `/vision` proxy surface.
//!
//! These endpoints accept image/video uploads, forward them to the
//! external detector, and stream the annotated result back. They do not
//! touch slot state; occupancy mutation happens through the camera and
//! detection flows.

use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use parkview_core::error::CoreError;
use parkview_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// One file pulled out of a multipart request.
struct UploadedFile {
    bytes: Vec<u8>,
    file_name: String,
}

/// POST /api/v1/vision/parking-space/recommend
///
/// Image (or short video) in, annotated PNG with the nearest free slot
/// out.
pub async fn recommend_space(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let (file, lot_id) = read_upload(multipart, &["file", "image", "video"]).await?;

    let annotated = state
        .detector
        .recommend_space(file.bytes, &file.file_name, lot_id)
        .await?;

    Ok(([(header::CONTENT_TYPE, annotated.content_type)], annotated.bytes))
}

/// POST /api/v1/vision/parking-space/recommend-video
pub async fn recommend_space_video(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let (file, lot_id) = read_upload(multipart, &["video", "file"]).await?;

    let annotated = state
        .detector
        .recommend_space_video(file.bytes, &file.file_name, lot_id)
        .await?;

    Ok(([(header::CONTENT_TYPE, annotated.content_type)], annotated.bytes))
}

/// POST /api/v1/vision/parking-space/annotate-video
///
/// Video in, fully annotated MP4 out (as a download).
pub async fn annotate_video(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let (file, lot_id) = read_upload(multipart, &["video", "file"]).await?;

    let annotated = state
        .detector
        .annotate_video(file.bytes, &file.file_name, lot_id)
        .await?;

    let disposition = format!("attachment; filename=\"annotated-{}\"", file.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, annotated.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        annotated.bytes,
    ))
}

/// POST /api/v1/vision/license-plate/detect
///
/// Image in, annotated PNG out; the recognized plate rides on the
/// `x-license-plate` response header when present.
pub async fn detect_license_plate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<axum::response::Response> {
    let (file, _lot_id) = read_upload(multipart, &["image", "file"]).await?;

    let detection = state
        .detector
        .detect_license_plate(file.bytes, &file.file_name)
        .await?;

    let mut response =
        ([(header::CONTENT_TYPE, detection.content_type)], detection.image).into_response();
    if let Some(plate) = detection.license_plate {
        if let Ok(value) = plate.parse() {
            response.headers_mut().insert("x-license-plate", value);
        }
    }
    Ok(response)
}

/// GET /api/v1/vision/license-plate/logs
///
/// Pass-through of the detector's plate log.
pub async fn plate_logs(State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    let logs = state.detector.plate_logs().await?;
    Ok(Json(logs))
}

/// Pull the first file field (trying `file_fields` names) and an
/// optional `parking_lot_id` text field out of a multipart request.
async fn read_upload(
    mut multipart: Multipart,
    file_fields: &[&str],
) -> AppResult<(UploadedFile, Option<DbId>)> {
    let mut file: Option<UploadedFile> = None;
    let mut lot_id: Option<DbId> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(|n| n.to_string()) else {
            continue;
        };

        if name == "parking_lot_id" {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?;
            lot_id = Some(text.trim().parse().map_err(|_| {
                AppError::Core(CoreError::Validation(
                    "parking_lot_id must be an integer".into(),
                ))
            })?);
        } else if file.is_none() && file_fields.contains(&name.as_str()) {
            let file_name = field
                .file_name()
                .unwrap_or("upload.bin")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?;
            file = Some(UploadedFile {
                bytes: bytes.to_vec(),
                file_name,
            });
        }
    }

    let file = file.ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "A file field is required (one of: {})",
            file_fields.join(", ")
        )))
    })?;
    Ok((file, lot_id))
}
