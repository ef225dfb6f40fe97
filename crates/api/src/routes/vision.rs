//! Route definitions for the `/vision` detector proxy.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::vision;
use crate::state::AppState;

/// Uploaded media cap: videos for annotation can be large.
const MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// Routes mounted at `/vision`.
///
/// ```text
/// POST /parking-space/recommend         -> annotated PNG
/// POST /parking-space/recommend-video   -> annotated PNG from video
/// POST /parking-space/annotate-video    -> annotated MP4 download
/// POST /license-plate/detect            -> annotated PNG + plate header
/// GET  /license-plate/logs              -> detector plate log
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/parking-space/recommend", post(vision::recommend_space))
        .route(
            "/parking-space/recommend-video",
            post(vision::recommend_space_video),
        )
        .route(
            "/parking-space/annotate-video",
            post(vision::annotate_video),
        )
        .route("/license-plate/detect", post(vision::detect_license_plate))
        .route("/license-plate/logs", get(vision::plate_logs))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
