//! Repository for the `payments` table.

use parkview_core::types::DbId;
use sqlx::PgPool;

use crate::models::payment::Payment;

/// Column list for `payments` queries.
const COLUMNS: &str =
    "id, parking_session_id, amount, payment_method, payment_time, status, created_at";

/// Provides CRUD operations for payments.
pub struct PaymentRepo;

impl PaymentRepo {
    /// Record a payment for a session, returning the created row.
    pub async fn create(
        pool: &PgPool,
        parking_session_id: DbId,
        amount: i64,
        payment_method: &str,
    ) -> Result<Payment, sqlx::Error> {
        let query = format!(
            "INSERT INTO payments (parking_session_id, amount, payment_method)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(parking_session_id)
            .bind(amount)
            .bind(payment_method)
            .fetch_one(pool)
            .await
    }

    /// Find a payment by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments WHERE id = $1");
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List payments for one session, oldest first.
    pub async fn list_by_session(
        pool: &PgPool,
        parking_session_id: DbId,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments
             WHERE parking_session_id = $1
             ORDER BY payment_time ASC"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(parking_session_id)
            .fetch_all(pool)
            .await
    }

    /// Update a payment's status, returning the new row.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("UPDATE payments SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
