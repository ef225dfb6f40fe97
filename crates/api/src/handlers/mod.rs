//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the repositories in `parkview_db` (and, for the
//! detection/vision flows, to the `parking` module and the detector
//! client) and map errors via [`crate::error::AppError`].

pub mod auth;
pub mod camera;
pub mod detection;
pub mod notification;
pub mod parking_lot;
pub mod parking_session;
pub mod parking_slot;
pub mod payment;
pub mod role;
pub mod upload;
pub mod user;
pub mod vehicle;
pub mod vision;
