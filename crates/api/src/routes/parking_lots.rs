//! Route definitions for the `/parking-lots` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{parking_lot, parking_slot};
use crate::state::AppState;

/// Routes mounted at `/parking-lots`.
///
/// ```text
/// GET    /                    -> list
/// POST   /                    -> create (admin)
/// GET    /{id}                -> get_by_id
/// PUT    /{id}                -> update (admin)
/// DELETE /{id}                -> delete (admin)
/// GET    /{id}/availability   -> per-status slot counts
/// GET    /{lot_id}/slots      -> slots of the lot (status filter)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(parking_lot::list).post(parking_lot::create))
        .route(
            "/{id}",
            get(parking_lot::get_by_id)
                .put(parking_lot::update)
                .delete(parking_lot::delete),
        )
        .route("/{id}/availability", get(parking_lot::availability))
        .route("/{lot_id}/slots", get(parking_slot::list_by_lot))
}
