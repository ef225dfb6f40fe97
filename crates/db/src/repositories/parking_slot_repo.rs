//! Repository for the `parking_slots` table.
//!
//! Besides plain CRUD, this repository carries the race-sensitive
//! primitives of slot allocation: row locks for candidate selection and
//! a compare-and-swap status flip, both meant to run inside the entry
//! transaction.

use parkview_core::status::SlotStatus;
use parkview_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::models::parking_slot::{
    CreateParkingSlot, ParkingSlot, ParkingSlotWithSession, UpdateParkingSlot,
};

/// Column list for `parking_slots` queries.
const COLUMNS: &str = "id, parking_lot_id, slot_code, status, coordinates, created_at";

/// Provides CRUD and allocation operations for parking slots.
pub struct ParkingSlotRepo;

impl ParkingSlotRepo {
    /// Insert a new slot, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateParkingSlot) -> Result<ParkingSlot, sqlx::Error> {
        let query = format!(
            "INSERT INTO parking_slots (parking_lot_id, slot_code, status, coordinates)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ParkingSlot>(&query)
            .bind(input.parking_lot_id)
            .bind(&input.slot_code)
            .bind(
                input
                    .status
                    .as_deref()
                    .unwrap_or(SlotStatus::Available.as_str()),
            )
            .bind(input.coordinates.clone().map(Json))
            .fetch_one(pool)
            .await
    }

    /// Find a slot by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ParkingSlot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parking_slots WHERE id = $1");
        sqlx::query_as::<_, ParkingSlot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List slots in a lot, optionally filtered by status, ordered by id.
    pub async fn list_by_lot(
        pool: &PgPool,
        parking_lot_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<ParkingSlot>, sqlx::Error> {
        let filter = if status.is_some() { "AND status = $2" } else { "" };
        let query = format!(
            "SELECT {COLUMNS} FROM parking_slots
             WHERE parking_lot_id = $1 {filter}
             ORDER BY id ASC"
        );
        let mut q = sqlx::query_as::<_, ParkingSlot>(&query).bind(parking_lot_id);
        if let Some(status) = status {
            q = q.bind(status);
        }
        q.fetch_all(pool).await
    }

    /// Update a slot, returning the new row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateParkingSlot,
    ) -> Result<Option<ParkingSlot>, sqlx::Error> {
        let query = format!(
            "UPDATE parking_slots
             SET slot_code = COALESCE($2, slot_code),
                 status = COALESCE($3, status),
                 coordinates = COALESCE($4, coordinates)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ParkingSlot>(&query)
            .bind(id)
            .bind(&input.slot_code)
            .bind(&input.status)
            .bind(input.coordinates.clone().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Delete a slot. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM parking_slots WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -- Allocation primitives (entry transaction) --

    /// Lock a specific slot row for the duration of the transaction.
    pub async fn lock_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<ParkingSlot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parking_slots WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, ParkingSlot>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Lock the first available slot in a lot (lowest id wins).
    ///
    /// `SKIP LOCKED` makes concurrent entries pass over each other's
    /// candidate rows instead of serializing on them, so two
    /// simultaneous entries get two different slots.
    pub async fn lock_first_available(
        conn: &mut PgConnection,
        parking_lot_id: DbId,
    ) -> Result<Option<ParkingSlot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM parking_slots
             WHERE parking_lot_id = $1 AND status = 'available'
             ORDER BY id ASC
             LIMIT 1
             FOR UPDATE SKIP LOCKED"
        );
        sqlx::query_as::<_, ParkingSlot>(&query)
            .bind(parking_lot_id)
            .fetch_optional(conn)
            .await
    }

    /// Conditionally flip a slot to occupied.
    ///
    /// Returns `true` only if the slot was still available; a `false`
    /// return means a concurrent writer won the slot.
    pub async fn try_occupy(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE parking_slots SET status = 'occupied'
             WHERE id = $1 AND status = 'available'",
        )
        .bind(id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flip an occupied slot back to available (exit, cancellation).
    pub async fn release(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE parking_slots SET status = 'available'
             WHERE id = $1 AND status = 'occupied'",
        )
        .bind(id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -- Reconciliation --

    /// Load every slot of a lot together with an active-session flag.
    pub async fn list_for_reconciliation(
        pool: &PgPool,
        parking_lot_id: DbId,
    ) -> Result<Vec<ParkingSlotWithSession>, sqlx::Error> {
        sqlx::query_as::<_, ParkingSlotWithSession>(
            "SELECT s.id, s.parking_lot_id, s.slot_code, s.status, s.coordinates,
                    EXISTS (
                        SELECT 1 FROM parking_sessions ps
                        WHERE ps.parking_slot_id = s.id AND ps.status = 'active'
                    ) AS has_active_session
             FROM parking_slots s
             WHERE s.parking_lot_id = $1
             ORDER BY s.id ASC",
        )
        .bind(parking_lot_id)
        .fetch_all(pool)
        .await
    }

    /// Mark the given slots occupied (camera evidence). Already
    /// occupied slots are left untouched.
    pub async fn mark_occupied_many(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE parking_slots SET status = 'occupied'
             WHERE id = ANY($1) AND status <> 'occupied'",
        )
        .bind(ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Reset the given occupied slots to available unless an active
    /// session still references them. The predicate re-checks the
    /// session invariant at write time, so a session opened after the
    /// reconciliation snapshot cannot be clobbered.
    pub async fn release_unoccupied_many(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE parking_slots s SET status = 'available'
             WHERE s.id = ANY($1)
               AND s.status = 'occupied'
               AND NOT EXISTS (
                   SELECT 1 FROM parking_sessions ps
                   WHERE ps.parking_slot_id = s.id AND ps.status = 'active'
               )",
        )
        .bind(ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
