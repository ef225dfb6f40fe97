//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET  /                  -> list (admin)
/// GET  /{id}              -> get_by_id (self or admin)
/// PUT  /{id}              -> update (self or admin)
/// POST /{id}/deactivate   -> deactivate (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::list))
        .route("/{id}", get(user::get_by_id).put(user::update))
        .route("/{id}/deactivate", post(user::deactivate))
}
