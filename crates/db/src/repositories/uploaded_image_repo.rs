//! Repository for the `uploaded_images` table.

use parkview_core::types::DbId;
use sqlx::PgPool;

use crate::models::uploaded_image::{CreateUploadedImage, UploadedImage};

/// Column list for `uploaded_images` queries.
const COLUMNS: &str =
    "id, user_id, file_name, stored_path, content_type, size_bytes, created_at";

/// Provides CRUD operations for uploaded image metadata.
pub struct UploadedImageRepo;

impl UploadedImageRepo {
    /// Record an uploaded image, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateUploadedImage,
    ) -> Result<UploadedImage, sqlx::Error> {
        let query = format!(
            "INSERT INTO uploaded_images
                (user_id, file_name, stored_path, content_type, size_bytes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UploadedImage>(&query)
            .bind(input.user_id)
            .bind(&input.file_name)
            .bind(&input.stored_path)
            .bind(&input.content_type)
            .bind(input.size_bytes)
            .fetch_one(pool)
            .await
    }

    /// Find an uploaded image by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<UploadedImage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM uploaded_images WHERE id = $1");
        sqlx::query_as::<_, UploadedImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all uploaded images, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<UploadedImage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM uploaded_images ORDER BY created_at DESC");
        sqlx::query_as::<_, UploadedImage>(&query)
            .fetch_all(pool)
            .await
    }

    /// Delete an uploaded image row. Returns `true` if a row was
    /// removed. The caller is responsible for removing the file bytes.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM uploaded_images WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
