//! Route tree assembly.

pub mod auth;
pub mod cameras;
pub mod detections;
pub mod health;
pub mod notifications;
pub mod parking_lots;
pub mod parking_sessions;
pub mod parking_slots;
pub mod payments;
pub mod roles;
pub mod uploads;
pub mod users;
pub mod vehicles;
pub mod vision;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/...               register, login, refresh, logout, me
/// /roles/...              role CRUD (admin)
/// /users/...              user management
/// /vehicles/...           registered vehicles
/// /parking-lots/...       lots, availability, nested slot listing
/// /parking-slots/...      slot CRUD and calibration
/// /parking-sessions/...   session queries, admin edit, payments
/// /payments/...           payment records
/// /cameras/...            camera CRUD + vision flows
/// /notifications/...      per-user notifications
/// /detections/...         detector webhooks (entry/exit, occupancy)
/// /vision/...             detector proxy endpoints
/// /uploads/...            uploaded image storage
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/roles", roles::router())
        .nest("/users", users::router())
        .nest("/vehicles", vehicles::router())
        .nest("/parking-lots", parking_lots::router())
        .nest("/parking-slots", parking_slots::router())
        .nest("/parking-sessions", parking_sessions::router())
        .nest("/payments", payments::router())
        .nest("/cameras", cameras::router())
        .nest("/notifications", notifications::router())
        .nest("/detections", detections::router())
        .nest("/vision", vision::router())
        .nest("/uploads", uploads::router())
}
