//! Handlers for the `/uploads` resource.
//!
//! Image bytes are written to the configured upload directory under a
//! generated name; the database row carries the metadata.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use parkview_core::error::CoreError;
use parkview_core::types::DbId;
use parkview_db::models::uploaded_image::{CreateUploadedImage, UploadedImage};
use parkview_db::repositories::UploadedImageRepo;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/uploads
///
/// Store an uploaded image on disk and record its metadata.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadedImage>)> {
    let mut stored: Option<(String, String, String, i64)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default();
        if name != "file" && name != "image" {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload.jpg").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?;

        // Generated name keeps uploads collision-free; the original
        // extension is preserved for serving.
        let extension = std::path::Path::new(&file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("jpg");
        let stored_path = format!(
            "{}/{}.{extension}",
            state.config.upload_dir.trim_end_matches('/'),
            Uuid::new_v4()
        );

        tokio::fs::create_dir_all(&state.config.upload_dir)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {e}")))?;
        tokio::fs::write(&stored_path, &bytes)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to write upload: {e}")))?;

        stored = Some((file_name, stored_path, content_type, bytes.len() as i64));
        break;
    }

    let Some((file_name, stored_path, content_type, size_bytes)) = stored else {
        return Err(AppError::Core(CoreError::Validation(
            "A file or image field is required".into(),
        )));
    };

    let image = UploadedImageRepo::create(
        &state.pool,
        &CreateUploadedImage {
            user_id: Some(auth.user_id),
            file_name,
            stored_path,
            content_type,
            size_bytes,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(image)))
}

/// GET /api/v1/uploads
pub async fn list(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UploadedImage>>>> {
    let images = UploadedImageRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: images }))
}

/// GET /api/v1/uploads/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<UploadedImage>> {
    let image = UploadedImageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "UploadedImage",
            id,
        })?;
    Ok(Json(image))
}

/// DELETE /api/v1/uploads/{id}
///
/// Removes the row and best-effort deletes the bytes on disk.
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let image = UploadedImageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "UploadedImage",
            id,
        })?;

    UploadedImageRepo::delete(&state.pool, id).await?;
    if let Err(err) = tokio::fs::remove_file(&image.stored_path).await {
        tracing::warn!(path = %image.stored_path, error = %err, "Failed to remove uploaded file");
    }

    Ok(StatusCode::NO_CONTENT)
}
