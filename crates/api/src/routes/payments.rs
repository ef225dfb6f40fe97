//! Route definitions for the `/payments` resource (staff).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::payment;
use crate::state::AppState;

/// Routes mounted at `/payments`.
///
/// ```text
/// POST /        -> create
/// GET  /{id}    -> get_by_id
/// PUT  /{id}    -> update (status)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(payment::create))
        .route("/{id}", get(payment::get_by_id).put(payment::update))
}
