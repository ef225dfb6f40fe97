//! Repository for the `parking_sessions` table.
//!
//! The insert/complete methods take `&mut PgConnection` so the state
//! machine can run them inside one transaction with the slot mutations.

use parkview_core::status::SessionStatus;
use parkview_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::parking_session::{
    ActiveSessionContext, ParkingSession, SessionFilter,
};

/// Column list for `parking_sessions` queries.
const COLUMNS: &str = "id, vehicle_id, license_plate, parking_slot_id, entry_time, \
                        exit_time, fee, status, created_at";

/// Default page size for session listing.
const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for session listing.
const MAX_LIMIT: i64 = 200;

/// Provides lifecycle and query operations for parking sessions.
pub struct ParkingSessionRepo;

impl ParkingSessionRepo {
    /// Find a session by its primary key.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ParkingSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parking_sessions WHERE id = $1");
        sqlx::query_as::<_, ParkingSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List sessions with optional status/lot/plate filters, newest
    /// first.
    pub async fn list(
        pool: &PgPool,
        filter: &SessionFilter,
    ) -> Result<Vec<ParkingSession>, sqlx::Error> {
        let limit = filter.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = filter.offset.unwrap_or(0).max(0);

        let query = format!(
            "SELECT s.{cols} FROM parking_sessions s
             JOIN parking_slots sl ON sl.id = s.parking_slot_id
             WHERE ($1::text IS NULL OR s.status = $1)
               AND ($2::bigint IS NULL OR sl.parking_lot_id = $2)
               AND ($3::text IS NULL OR s.license_plate = $3)
             ORDER BY s.entry_time DESC
             LIMIT $4 OFFSET $5",
            cols = COLUMNS.replace(", ", ", s."),
        );
        sqlx::query_as::<_, ParkingSession>(&query)
            .bind(&filter.status)
            .bind(filter.parking_lot_id)
            .bind(&filter.license_plate)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Active session for a registered vehicle, if any.
    pub async fn find_active_by_vehicle(
        pool: &PgPool,
        vehicle_id: DbId,
    ) -> Result<Option<ParkingSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM parking_sessions
             WHERE vehicle_id = $1 AND status = 'active'"
        );
        sqlx::query_as::<_, ParkingSession>(&query)
            .bind(vehicle_id)
            .fetch_optional(pool)
            .await
    }

    /// Active walk-up session for a plate (no vehicle record), if any.
    pub async fn find_active_by_plate(
        pool: &PgPool,
        license_plate: &str,
    ) -> Result<Option<ParkingSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM parking_sessions
             WHERE license_plate = $1 AND vehicle_id IS NULL AND status = 'active'"
        );
        sqlx::query_as::<_, ParkingSession>(&query)
            .bind(license_plate)
            .fetch_optional(pool)
            .await
    }

    /// Active session joined with its slot and lot, looked up by
    /// vehicle id or (for walk-ups) by plate.
    pub async fn find_active_context(
        pool: &PgPool,
        vehicle_id: Option<DbId>,
        license_plate: &str,
    ) -> Result<Option<ActiveSessionContext>, sqlx::Error> {
        sqlx::query_as::<_, ActiveSessionContext>(
            "SELECT s.id, s.vehicle_id, s.license_plate, s.parking_slot_id, s.entry_time,
                    sl.slot_code, sl.parking_lot_id, l.price_per_hour
             FROM parking_sessions s
             JOIN parking_slots sl ON sl.id = s.parking_slot_id
             JOIN parking_lots l ON l.id = sl.parking_lot_id
             WHERE s.status = 'active'
               AND (($1::bigint IS NOT NULL AND s.vehicle_id = $1)
                 OR ($1::bigint IS NULL AND s.vehicle_id IS NULL AND s.license_plate = $2))",
        )
        .bind(vehicle_id)
        .bind(license_plate)
        .fetch_optional(pool)
        .await
    }

    /// Insert a new active session inside the entry transaction.
    ///
    /// The partial unique indexes on active sessions make this the
    /// authoritative duplicate check: a concurrent entry for the same
    /// identity fails here with a unique violation.
    pub async fn insert_active(
        conn: &mut PgConnection,
        vehicle_id: Option<DbId>,
        license_plate: &str,
        parking_slot_id: DbId,
        entry_time: Timestamp,
    ) -> Result<ParkingSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO parking_sessions
                (vehicle_id, license_plate, parking_slot_id, entry_time, status)
             VALUES ($1, $2, $3, $4, 'active')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ParkingSession>(&query)
            .bind(vehicle_id)
            .bind(license_plate)
            .bind(parking_slot_id)
            .bind(entry_time)
            .fetch_one(conn)
            .await
    }

    /// Complete an active session: exit time, fee, and status change in
    /// one conditional update. Returns the updated row, or `None` when
    /// the session was no longer active (a concurrent exit won).
    pub async fn complete(
        conn: &mut PgConnection,
        id: DbId,
        exit_time: Timestamp,
        fee: i64,
    ) -> Result<Option<ParkingSession>, sqlx::Error> {
        let query = format!(
            "UPDATE parking_sessions
             SET exit_time = $2, fee = $3, status = 'completed'
             WHERE id = $1 AND status = 'active'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ParkingSession>(&query)
            .bind(id)
            .bind(exit_time)
            .bind(fee)
            .fetch_optional(conn)
            .await
    }

    /// Admin-only direct status edit. Returns the updated row.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: SessionStatus,
    ) -> Result<Option<ParkingSession>, sqlx::Error> {
        let query = format!(
            "UPDATE parking_sessions SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ParkingSession>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }
}
