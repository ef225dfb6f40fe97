//! Route definitions for the `/detections` webhook surface.
//!
//! Called machine-to-machine by the external detector.

use axum::routing::post;
use axum::Router;

use crate::handlers::detection;
use crate::state::AppState;

/// Routes mounted at `/detections`.
///
/// ```text
/// POST /             -> handle_detection (entry/exit state machine)
/// POST /occupancy    -> reconcile_occupancy
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(detection::handle_detection))
        .route("/occupancy", post(detection::reconcile_occupancy))
}
