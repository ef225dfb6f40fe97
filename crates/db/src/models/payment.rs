use parkview_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `payments` table. `amount` is in integer currency
/// units.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub parking_session_id: DbId,
    pub amount: i64,
    pub payment_method: String,
    pub payment_time: Timestamp,
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for recording a payment. When `amount` is omitted the session's
/// computed fee is charged.
#[derive(Debug, Deserialize)]
pub struct CreatePayment {
    pub parking_session_id: DbId,
    pub amount: Option<i64>,
    pub payment_method: String,
}

/// DTO for updating a payment's status.
#[derive(Debug, Deserialize)]
pub struct UpdatePayment {
    pub status: String,
}
