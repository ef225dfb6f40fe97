use parkview_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `cameras` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Camera {
    pub id: DbId,
    pub name: String,
    pub stream_url: String,
    pub camera_type: String,
    pub status: String,
    pub parking_lot_id: Option<DbId>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a camera.
#[derive(Debug, Deserialize)]
pub struct CreateCamera {
    pub name: String,
    pub stream_url: String,
    pub camera_type: Option<String>,
    pub status: Option<String>,
    pub parking_lot_id: Option<DbId>,
    pub description: Option<String>,
    pub location: Option<String>,
}

/// DTO for updating a camera.
#[derive(Debug, Deserialize)]
pub struct UpdateCamera {
    pub name: Option<String>,
    pub stream_url: Option<String>,
    pub camera_type: Option<String>,
    pub status: Option<String>,
    pub parking_lot_id: Option<DbId>,
    pub description: Option<String>,
    pub location: Option<String>,
}
