//! Route definitions for the `/parking-slots` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::parking_slot;
use crate::state::AppState;

/// Routes mounted at `/parking-slots`.
///
/// ```text
/// POST   /        -> create (admin)
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update (admin; status override, calibration)
/// DELETE /{id}    -> delete (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(parking_slot::create))
        .route(
            "/{id}",
            get(parking_slot::get_by_id)
                .put(parking_slot::update)
                .delete(parking_slot::delete),
        )
}
