//! Vehicle exit: fee computation, session completion, slot release.

use chrono::Utc;
use parkview_core::fees::{compute_fee, FeeSchedule};
use parkview_core::parking::ParkingError;
use parkview_db::models::parking_session::ParkingSession;
use parkview_db::models::vehicle::Vehicle;
use parkview_db::repositories::{ParkingSessionRepo, ParkingSlotRepo};

use crate::error::AppResult;
use crate::notifications;
use crate::state::AppState;

/// Result of a successful vehicle exit.
#[derive(Debug)]
pub struct ExitOutcome {
    /// The completed session (exit time, fee, and status set).
    pub session: ParkingSession,
    /// Code of the slot that was released.
    pub slot_code: String,
    /// Full fee schedule, including the per-hour breakdown.
    pub fee: FeeSchedule,
    /// The registered vehicle, when the plate matched one.
    pub vehicle: Option<Vehicle>,
    pub notification_sent: bool,
}

/// Close the active session for a detected plate.
///
/// The fee is computed before any mutation; completion and slot
/// release then run in one transaction. The completion update is
/// conditional on the session still being active, so a concurrent exit
/// cannot complete the same session twice.
pub async fn process_exit(
    state: &AppState,
    license_plate: &str,
    vehicle: Option<&Vehicle>,
) -> AppResult<ExitOutcome> {
    let ctx = ParkingSessionRepo::find_active_context(
        &state.pool,
        vehicle.map(|v| v.id),
        license_plate,
    )
    .await?
    .ok_or_else(|| ParkingError::NoActiveSession {
        license_plate: license_plate.to_string(),
    })?;

    // A missing or non-positive lot rate fails the exit outright; a
    // zero fee must never be persisted.
    let exit_time = Utc::now();
    let fee = compute_fee(
        ctx.entry_time,
        exit_time,
        ctx.price_per_hour,
        &state.config.parking.fee_policy(),
    )?;

    let mut tx = state.pool.begin().await?;

    let session = ParkingSessionRepo::complete(&mut tx, ctx.id, exit_time, fee.total_fee)
        .await?
        .ok_or_else(|| ParkingError::NoActiveSession {
            license_plate: license_plate.to_string(),
        })?;

    ParkingSlotRepo::release(&mut tx, ctx.parking_slot_id).await?;

    tx.commit().await?;

    tracing::info!(
        session_id = session.id,
        slot_id = ctx.parking_slot_id,
        license_plate,
        total_fee = fee.total_fee,
        duration_hours = fee.duration_hours,
        "Vehicle exit processed"
    );

    let mut notification_sent = false;
    if let Some(vehicle) = vehicle {
        let message = notifications::exit_message(license_plate, fee.total_fee);
        notification_sent =
            notifications::notify_user(&state.pool, vehicle.user_id, &message).await;
    }

    Ok(ExitOutcome {
        session,
        slot_code: ctx.slot_code,
        fee,
        vehicle: vehicle.cloned(),
        notification_sent,
    })
}
