//! Repository for the `cameras` table.

use parkview_core::status::{camera_status, camera_type};
use parkview_core::types::DbId;
use sqlx::PgPool;

use crate::models::camera::{Camera, CreateCamera, UpdateCamera};

/// Column list for `cameras` queries.
const COLUMNS: &str = "id, name, stream_url, camera_type, status, parking_lot_id, \
                        description, location, created_at, updated_at";

/// Provides CRUD operations for cameras.
pub struct CameraRepo;

impl CameraRepo {
    /// Register a camera, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCamera) -> Result<Camera, sqlx::Error> {
        let query = format!(
            "INSERT INTO cameras
                (name, stream_url, camera_type, status, parking_lot_id, description, location)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Camera>(&query)
            .bind(&input.name)
            .bind(&input.stream_url)
            .bind(input.camera_type.as_deref().unwrap_or(camera_type::RTSP))
            .bind(input.status.as_deref().unwrap_or(camera_status::ACTIVE))
            .bind(input.parking_lot_id)
            .bind(&input.description)
            .bind(&input.location)
            .fetch_one(pool)
            .await
    }

    /// Find a camera by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Camera>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cameras WHERE id = $1");
        sqlx::query_as::<_, Camera>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List cameras, optionally restricted to one lot.
    pub async fn list(
        pool: &PgPool,
        parking_lot_id: Option<DbId>,
    ) -> Result<Vec<Camera>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cameras
             WHERE $1::bigint IS NULL OR parking_lot_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Camera>(&query)
            .bind(parking_lot_id)
            .fetch_all(pool)
            .await
    }

    /// Update a camera, returning the new row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCamera,
    ) -> Result<Option<Camera>, sqlx::Error> {
        let query = format!(
            "UPDATE cameras
             SET name = COALESCE($2, name),
                 stream_url = COALESCE($3, stream_url),
                 camera_type = COALESCE($4, camera_type),
                 status = COALESCE($5, status),
                 parking_lot_id = COALESCE($6, parking_lot_id),
                 description = COALESCE($7, description),
                 location = COALESCE($8, location),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Camera>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.stream_url)
            .bind(&input.camera_type)
            .bind(&input.status)
            .bind(input.parking_lot_id)
            .bind(&input.description)
            .bind(&input.location)
            .fetch_optional(pool)
            .await
    }

    /// Delete a camera. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cameras WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
