//! Vehicle entry: duplicate check, slot allocation, session open.

use chrono::Utc;
use parkview_core::error::CoreError;
use parkview_core::parking::{ParkingError, SlotRejection};
use parkview_core::status::SlotStatus;
use parkview_core::types::DbId;
use parkview_db::models::parking_session::ParkingSession;
use parkview_db::models::parking_slot::ParkingSlot;
use parkview_db::models::vehicle::Vehicle;
use parkview_db::repositories::{
    ParkingLotRepo, ParkingSessionRepo, ParkingSlotRepo,
};

use crate::error::{AppError, AppResult};
use crate::notifications;
use crate::state::AppState;

/// Result of a successful vehicle entry.
#[derive(Debug)]
pub struct EntryOutcome {
    pub session: ParkingSession,
    pub slot: ParkingSlot,
    /// The registered vehicle, when the plate matched one.
    pub vehicle: Option<Vehicle>,
    pub notification_sent: bool,
}

/// Open a parking session for a detected plate.
///
/// The allocation and the session insert run in one transaction: the
/// candidate slot row is locked (`FOR UPDATE`, with `SKIP LOCKED` for
/// the first-available scan), the session is inserted, and the slot is
/// flipped to occupied with a conditional update. A failed session
/// write therefore never leaves a slot marked occupied.
pub async fn process_entry(
    state: &AppState,
    license_plate: &str,
    vehicle: Option<&Vehicle>,
    parking_lot_id: Option<DbId>,
    suggested_slot_id: Option<DbId>,
) -> AppResult<EntryOutcome> {
    // Friendly duplicate check before touching any slot. The partial
    // unique indexes remain the authoritative guard against races.
    let existing = match vehicle {
        Some(vehicle) => {
            ParkingSessionRepo::find_active_by_vehicle(&state.pool, vehicle.id).await?
        }
        None => ParkingSessionRepo::find_active_by_plate(&state.pool, license_plate).await?,
    };
    if let Some(session) = existing {
        return Err(ParkingError::DuplicateActiveSession {
            existing_session_id: session.id,
        }
        .into());
    }

    let lot_id = parking_lot_id.ok_or(ParkingError::MissingParkingLot)?;
    ParkingLotRepo::find_by_id(&state.pool, lot_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ParkingLot",
            id: lot_id,
        })?;

    let mut tx = state.pool.begin().await?;

    let slot = allocate_slot(&mut tx, lot_id, suggested_slot_id).await?;

    let entry_time = Utc::now();
    let session = match ParkingSessionRepo::insert_active(
        &mut tx,
        vehicle.map(|v| v.id),
        license_plate,
        slot.id,
        entry_time,
    )
    .await
    {
        Ok(session) => session,
        Err(err) if is_active_session_conflict(&err) => {
            // A concurrent entry for the same identity committed first.
            // Dropping the transaction rolls the allocation back.
            drop(tx);
            let survivor = match vehicle {
                Some(vehicle) => {
                    ParkingSessionRepo::find_active_by_vehicle(&state.pool, vehicle.id).await?
                }
                None => {
                    ParkingSessionRepo::find_active_by_plate(&state.pool, license_plate).await?
                }
            };
            return match survivor {
                Some(session) => Err(ParkingError::DuplicateActiveSession {
                    existing_session_id: session.id,
                }
                .into()),
                None => Err(AppError::Database(err)),
            };
        }
        Err(err) => return Err(err.into()),
    };

    // Conditional status flip; rows_affected 0 means another writer
    // took the slot despite the lock (e.g. an admin edit).
    if !ParkingSlotRepo::try_occupy(&mut tx, slot.id).await? {
        return Err(ParkingError::SlotUnavailable {
            slot_id: slot.id,
            lot_id,
            reason: SlotRejection::NotAvailable,
        }
        .into());
    }

    tx.commit().await?;

    tracing::info!(
        session_id = session.id,
        slot_id = slot.id,
        license_plate,
        registered = vehicle.is_some(),
        "Vehicle entry processed"
    );

    let mut notification_sent = false;
    if let Some(vehicle) = vehicle {
        let message = notifications::entry_message(license_plate, &slot.slot_code);
        notification_sent =
            notifications::notify_user(&state.pool, vehicle.user_id, &message).await;
    }

    Ok(EntryOutcome {
        session,
        slot: ParkingSlot {
            status: SlotStatus::Occupied.as_str().to_string(),
            ..slot
        },
        vehicle: vehicle.cloned(),
        notification_sent,
    })
}

/// Pick the slot for this entry, holding its row lock until commit.
///
/// With a suggested slot id the slot must exist, belong to the target
/// lot, and be available, each failure reported distinctly. Otherwise
/// the first available slot by ascending id wins; `SKIP LOCKED` keeps
/// concurrent entries off each other's candidate.
async fn allocate_slot(
    tx: &mut sqlx::PgConnection,
    lot_id: DbId,
    suggested_slot_id: Option<DbId>,
) -> AppResult<ParkingSlot> {
    match suggested_slot_id {
        Some(slot_id) => {
            let slot = ParkingSlotRepo::lock_by_id(tx, slot_id)
                .await?
                .ok_or(ParkingError::SlotUnavailable {
                    slot_id,
                    lot_id,
                    reason: SlotRejection::NotFound,
                })?;
            if slot.parking_lot_id != lot_id {
                return Err(ParkingError::SlotUnavailable {
                    slot_id,
                    lot_id,
                    reason: SlotRejection::WrongLot,
                }
                .into());
            }
            if SlotStatus::parse(&slot.status) != Some(SlotStatus::Available) {
                return Err(ParkingError::SlotUnavailable {
                    slot_id,
                    lot_id,
                    reason: SlotRejection::NotAvailable,
                }
                .into());
            }
            Ok(slot)
        }
        None => ParkingSlotRepo::lock_first_available(tx, lot_id)
            .await?
            .ok_or_else(|| ParkingError::NoSlotAvailable { lot_id }.into()),
    }
}

/// Whether a sqlx error is a violation of one of the active-session
/// partial unique indexes.
fn is_active_session_conflict(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db)
            if db.code().as_deref() == Some("23505")
                && db
                    .constraint()
                    .is_some_and(|c| c.starts_with("uq_parking_sessions_active"))
    )
}
