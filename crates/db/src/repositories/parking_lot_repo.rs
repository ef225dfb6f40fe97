//! Repository for the `parking_lots` table.

use parkview_core::types::DbId;
use sqlx::PgPool;

use crate::models::parking_lot::{
    CreateParkingLot, LotAvailability, ParkingLot, UpdateParkingLot,
};

/// Column list for `parking_lots` queries.
const COLUMNS: &str = "id, name, location, total_slots, price_per_hour, created_at";

/// Provides CRUD operations for parking lots.
pub struct ParkingLotRepo;

impl ParkingLotRepo {
    /// Insert a new lot, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateParkingLot) -> Result<ParkingLot, sqlx::Error> {
        let query = format!(
            "INSERT INTO parking_lots (name, location, total_slots, price_per_hour)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ParkingLot>(&query)
            .bind(&input.name)
            .bind(&input.location)
            .bind(input.total_slots.unwrap_or(0))
            .bind(input.price_per_hour)
            .fetch_one(pool)
            .await
    }

    /// Find a lot by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ParkingLot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parking_lots WHERE id = $1");
        sqlx::query_as::<_, ParkingLot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all lots by ascending id.
    pub async fn list(pool: &PgPool) -> Result<Vec<ParkingLot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parking_lots ORDER BY id ASC");
        sqlx::query_as::<_, ParkingLot>(&query).fetch_all(pool).await
    }

    /// Update a lot, returning the new row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateParkingLot,
    ) -> Result<Option<ParkingLot>, sqlx::Error> {
        let query = format!(
            "UPDATE parking_lots
             SET name = COALESCE($2, name),
                 location = COALESCE($3, location),
                 total_slots = COALESCE($4, total_slots),
                 price_per_hour = COALESCE($5, price_per_hour)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ParkingLot>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.location)
            .bind(input.total_slots)
            .bind(input.price_per_hour)
            .fetch_optional(pool)
            .await
    }

    /// Delete a lot (cascades to its slots). Returns `true` if a row
    /// was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM parking_lots WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Per-status slot counts for one lot.
    pub async fn availability(pool: &PgPool, id: DbId) -> Result<Vec<LotAvailability>, sqlx::Error> {
        sqlx::query_as::<_, LotAvailability>(
            "SELECT status, COUNT(*) AS count
             FROM parking_slots
             WHERE parking_lot_id = $1
             GROUP BY status
             ORDER BY status",
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }
}
