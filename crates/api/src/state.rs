use std::sync::Arc;

use parkview_core::geometry::GeometryEngine;
use parkview_detector::DetectorApi;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: parkview_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// External computer-vision service client.
    pub detector: Arc<DetectorApi>,
    /// Polygon geometry engine used by occupancy reconciliation.
    pub geometry: Arc<dyn GeometryEngine>,
    /// Plain HTTP client for camera snapshot/stream fetching.
    pub http: reqwest::Client,
}
