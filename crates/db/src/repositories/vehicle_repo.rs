//! Repository for the `vehicles` table.

use parkview_core::types::DbId;
use sqlx::PgPool;

use crate::models::vehicle::{UpdateVehicle, Vehicle};

/// Column list for `vehicles` queries.
const COLUMNS: &str = "id, user_id, license_plate, vehicle_type, created_at";

/// Provides CRUD operations for registered vehicles.
pub struct VehicleRepo;

impl VehicleRepo {
    /// Register a vehicle for a user, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        license_plate: &str,
        vehicle_type: &str,
    ) -> Result<Vehicle, sqlx::Error> {
        let query = format!(
            "INSERT INTO vehicles (user_id, license_plate, vehicle_type)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(user_id)
            .bind(license_plate)
            .bind(vehicle_type)
            .fetch_one(pool)
            .await
    }

    /// Find a vehicle by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vehicles WHERE id = $1");
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a vehicle by license plate (any owner).
    ///
    /// The detection flow treats a matching row as a registered vehicle;
    /// plates with no row are billed as walk-ups.
    pub async fn find_by_plate(
        pool: &PgPool,
        license_plate: &str,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vehicles WHERE license_plate = $1 ORDER BY id ASC LIMIT 1"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(license_plate)
            .fetch_optional(pool)
            .await
    }

    /// List all vehicles owned by a user.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Vehicle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vehicles WHERE user_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List all vehicles by ascending id.
    pub async fn list(pool: &PgPool) -> Result<Vec<Vehicle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vehicles ORDER BY id ASC");
        sqlx::query_as::<_, Vehicle>(&query).fetch_all(pool).await
    }

    /// Update a vehicle, returning the new row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVehicle,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!(
            "UPDATE vehicles
             SET license_plate = COALESCE($2, license_plate),
                 vehicle_type = COALESCE($3, vehicle_type)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .bind(&input.license_plate)
            .bind(&input.vehicle_type)
            .fetch_optional(pool)
            .await
    }

    /// Delete a vehicle. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
