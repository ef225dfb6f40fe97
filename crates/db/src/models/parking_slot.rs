use parkview_core::geometry::Polygon;
use parkview_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `parking_slots` table. `coordinates` is the slot's
/// footprint polygon in the shared camera coordinate space, when one
/// has been calibrated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParkingSlot {
    pub id: DbId,
    pub parking_lot_id: DbId,
    pub slot_code: String,
    pub status: String,
    pub coordinates: Option<Json<Polygon>>,
    pub created_at: Timestamp,
}

/// A slot joined with whether an active session references it, as
/// loaded for occupancy reconciliation.
#[derive(Debug, Clone, FromRow)]
pub struct ParkingSlotWithSession {
    pub id: DbId,
    pub parking_lot_id: DbId,
    pub slot_code: String,
    pub status: String,
    pub coordinates: Option<Json<Polygon>>,
    pub has_active_session: bool,
}

/// DTO for creating a slot.
#[derive(Debug, Deserialize)]
pub struct CreateParkingSlot {
    pub parking_lot_id: DbId,
    pub slot_code: String,
    pub status: Option<String>,
    pub coordinates: Option<Polygon>,
}

/// DTO for updating a slot.
#[derive(Debug, Deserialize)]
pub struct UpdateParkingSlot {
    pub slot_code: Option<String>,
    pub status: Option<String>,
    pub coordinates: Option<Polygon>,
}
