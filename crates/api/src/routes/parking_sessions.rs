//! Route definitions for the `/parking-sessions` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{parking_session, payment};
use crate::state::AppState;

/// Routes mounted at `/parking-sessions`.
///
/// ```text
/// GET /                 -> list (staff; status/lot/plate filters)
/// GET /{id}             -> get_by_id (staff)
/// PUT /{id}             -> update (admin; only path to cancelled)
/// GET /{id}/payments    -> payments of the session (staff)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(parking_session::list))
        .route(
            "/{id}",
            get(parking_session::get_by_id).put(parking_session::update),
        )
        .route("/{id}/payments", get(payment::list_by_session))
}
