//! The vehicle entry/exit state machine and occupancy reconciliation.
//!
//! A detection event carries a license plate and a direction flag. On
//! entry, a slot is allocated and an active session opened; on exit,
//! the active session is completed with a computed fee and its slot
//! released. Both flows run their read-then-write section inside one
//! transaction, with row locks and conditional updates closing the
//! races a naive implementation would have (two entries winning the
//! same slot, or the same plate entering twice).

pub mod entry;
pub mod exit;
pub mod reconcile;

use parkview_core::parking::EntryFlag;
use parkview_core::types::DbId;
use parkview_db::repositories::VehicleRepo;

use crate::error::AppResult;
use crate::state::AppState;

pub use entry::EntryOutcome;
pub use exit::ExitOutcome;
pub use reconcile::ReconcileSummary;

/// Result of one handled detection event.
#[derive(Debug)]
pub enum DetectionOutcome {
    Entry(EntryOutcome),
    Exit(ExitOutcome),
}

/// Decide entry vs. exit for a detected plate and run the matching
/// flow.
///
/// The plate is resolved against the registered-vehicle table first;
/// plates with no match are handled as walk-ups (billed by plate, no
/// fabricated vehicle or user records).
pub async fn handle_detection(
    state: &AppState,
    license_plate: &str,
    flag: EntryFlag,
    parking_lot_id: Option<DbId>,
    suggested_slot_id: Option<DbId>,
) -> AppResult<DetectionOutcome> {
    let vehicle = VehicleRepo::find_by_plate(&state.pool, license_plate).await?;

    match flag {
        EntryFlag::Entry => {
            let outcome = entry::process_entry(
                state,
                license_plate,
                vehicle.as_ref(),
                parking_lot_id,
                suggested_slot_id,
            )
            .await?;
            Ok(DetectionOutcome::Entry(outcome))
        }
        EntryFlag::Exit => {
            let outcome = exit::process_exit(state, license_plate, vehicle.as_ref()).await?;
            Ok(DetectionOutcome::Exit(outcome))
        }
    }
}
