//! Route definitions for the `/uploads` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::handlers::upload;
use crate::state::AppState;

/// Uploaded image cap.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Routes mounted at `/uploads`.
///
/// ```text
/// GET    /        -> list (staff)
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// DELETE /{id}    -> delete (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(upload::list).post(upload::create))
        .route("/{id}", get(upload::get_by_id).delete(upload::delete))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
