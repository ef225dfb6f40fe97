//! Apply camera evidence to slot statuses for one lot.

use parkview_core::error::CoreError;
use parkview_core::geometry::Polygon;
use parkview_core::occupancy::{plan_occupancy, SlotObservation};
use parkview_core::status::SlotStatus;
use parkview_core::types::DbId;
use parkview_db::repositories::{ParkingLotRepo, ParkingSlotRepo};

use crate::error::AppResult;
use crate::state::AppState;

/// What one reconciliation pass changed.
#[derive(Debug, serde::Serialize)]
pub struct ReconcileSummary {
    pub parking_lot_id: DbId,
    /// Slots evaluated against the detected vehicles.
    pub evaluated: usize,
    /// Slots flipped to occupied.
    pub occupied: u64,
    /// Slots reset to available.
    pub released: u64,
    /// Slots skipped (no coordinates or invalid footprint).
    pub skipped: Vec<DbId>,
}

/// Run one full occupancy pass: every detected vehicle against every
/// slot footprint of the lot.
///
/// The planner works on a snapshot; both bulk updates re-check status
/// at write time, and the release update additionally re-checks the
/// active-session invariant, so a session opened after the snapshot
/// keeps its slot occupied.
pub async fn reconcile_lot(
    state: &AppState,
    parking_lot_id: DbId,
    vehicles: &[Polygon],
) -> AppResult<ReconcileSummary> {
    ParkingLotRepo::find_by_id(&state.pool, parking_lot_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ParkingLot",
            id: parking_lot_id,
        })?;

    let rows = ParkingSlotRepo::list_for_reconciliation(&state.pool, parking_lot_id).await?;
    let observations: Vec<SlotObservation> = rows
        .into_iter()
        .map(|row| {
            let status = SlotStatus::parse(&row.status).unwrap_or_else(|| {
                tracing::warn!(slot_id = row.id, status = %row.status, "Unknown slot status");
                SlotStatus::OutOfService
            });
            SlotObservation {
                id: row.id,
                status,
                polygon: row.coordinates.map(|json| json.0),
                has_active_session: row.has_active_session,
            }
        })
        .collect();

    let plan = plan_occupancy(
        &observations,
        vehicles,
        state.geometry.as_ref(),
        state.config.parking.occupancy_threshold,
    );

    let occupied = if plan.occupy.is_empty() {
        0
    } else {
        ParkingSlotRepo::mark_occupied_many(&state.pool, &plan.occupy).await?
    };
    let released = if plan.release.is_empty() {
        0
    } else {
        ParkingSlotRepo::release_unoccupied_many(&state.pool, &plan.release).await?
    };

    tracing::info!(
        parking_lot_id,
        vehicles = vehicles.len(),
        evaluated = observations.len(),
        occupied,
        released,
        skipped = plan.skipped.len(),
        "Occupancy reconciliation applied"
    );

    Ok(ReconcileSummary {
        parking_lot_id,
        evaluated: observations.len(),
        occupied,
        released,
        skipped: plan.skipped,
    })
}
