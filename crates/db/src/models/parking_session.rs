use parkview_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `parking_sessions` table.
///
/// `vehicle_id` is NULL for walk-up vehicles; the plate string on the
/// session is then the only identity.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParkingSession {
    pub id: DbId,
    pub vehicle_id: Option<DbId>,
    pub license_plate: String,
    pub parking_slot_id: DbId,
    pub entry_time: Timestamp,
    pub exit_time: Option<Timestamp>,
    pub fee: Option<i64>,
    pub status: String,
    pub created_at: Timestamp,
}

/// An active session joined with its slot and lot, as needed by the
/// exit flow (fee rate resolution + slot release).
#[derive(Debug, Clone, FromRow)]
pub struct ActiveSessionContext {
    pub id: DbId,
    pub vehicle_id: Option<DbId>,
    pub license_plate: String,
    pub parking_slot_id: DbId,
    pub entry_time: Timestamp,
    pub slot_code: String,
    pub parking_lot_id: DbId,
    pub price_per_hour: i64,
}

/// DTO for the admin-only direct session edit. Setting the status to
/// `cancelled` is only possible through this path.
#[derive(Debug, Deserialize)]
pub struct UpdateParkingSession {
    pub status: Option<String>,
}

/// Query filters for listing sessions.
#[derive(Debug, Default, Deserialize)]
pub struct SessionFilter {
    pub status: Option<String>,
    pub parking_lot_id: Option<DbId>,
    pub license_plate: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
