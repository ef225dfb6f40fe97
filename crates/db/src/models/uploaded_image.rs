use parkview_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `uploaded_images` table. Bytes live on local disk at
/// `stored_path`; this row is the metadata.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UploadedImage {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub file_name: String,
    pub stored_path: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub created_at: Timestamp,
}

/// Insert payload for the uploaded-image repository.
#[derive(Debug)]
pub struct CreateUploadedImage {
    pub user_id: Option<DbId>,
    pub file_name: String,
    pub stored_path: String,
    pub content_type: String,
    pub size_bytes: i64,
}
