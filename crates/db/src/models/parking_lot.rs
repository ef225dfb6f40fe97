use parkview_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `parking_lots` table. `price_per_hour` is in integer
/// currency units.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParkingLot {
    pub id: DbId,
    pub name: String,
    pub location: String,
    pub total_slots: i32,
    pub price_per_hour: i64,
    pub created_at: Timestamp,
}

/// DTO for creating a parking lot.
#[derive(Debug, Deserialize)]
pub struct CreateParkingLot {
    pub name: String,
    pub location: String,
    pub total_slots: Option<i32>,
    pub price_per_hour: i64,
}

/// DTO for updating a parking lot.
#[derive(Debug, Deserialize)]
pub struct UpdateParkingLot {
    pub name: Option<String>,
    pub location: Option<String>,
    pub total_slots: Option<i32>,
    pub price_per_hour: Option<i64>,
}

/// Per-status slot counts for one lot.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LotAvailability {
    pub status: String,
    pub count: i64,
}
