use parkview_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `vehicles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vehicle {
    pub id: DbId,
    pub user_id: DbId,
    pub license_plate: String,
    pub vehicle_type: String,
    pub created_at: Timestamp,
}

/// DTO for registering a vehicle.
#[derive(Debug, Deserialize)]
pub struct CreateVehicle {
    pub license_plate: String,
    pub vehicle_type: Option<String>,
}

/// DTO for updating a vehicle.
#[derive(Debug, Deserialize)]
pub struct UpdateVehicle {
    pub license_plate: Option<String>,
    pub vehicle_type: Option<String>,
}
