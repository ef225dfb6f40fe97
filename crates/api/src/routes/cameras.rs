//! Route definitions for the `/cameras` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::camera;
use crate::state::AppState;

/// Routes mounted at `/cameras`.
///
/// ```text
/// GET    /                            -> list (staff)
/// POST   /                            -> create (admin)
/// GET    /{id}                        -> get_by_id (staff)
/// PUT    /{id}                        -> update (admin)
/// DELETE /{id}                        -> delete (admin)
/// GET    /{id}/stream                 -> stream descriptor (staff)
/// POST   /{id}/process-vehicle        -> plate OCR + auto entry/exit
/// POST   /{id}/detect-parking-space   -> recommendation + reconciliation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(camera::list).post(camera::create))
        .route(
            "/{id}",
            get(camera::get_by_id)
                .put(camera::update)
                .delete(camera::delete),
        )
        .route("/{id}/stream", get(camera::stream_info))
        .route("/{id}/process-vehicle", post(camera::process_vehicle))
        .route(
            "/{id}/detect-parking-space",
            post(camera::detect_parking_space),
        )
}
