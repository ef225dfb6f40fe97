//! Best-effort user notifications.
//!
//! Entry/exit notifications must never fail the flow that triggered
//! them: delivery problems are logged and swallowed. Rows land in the
//! `notifications` table; push delivery to devices is an external
//! concern.

use parkview_db::repositories::NotificationRepo;
use parkview_db::DbPool;
use parkview_core::types::DbId;

/// Store a notification for a user. Returns `true` when the row was
/// written; failures are logged and reported as `false`, never
/// propagated.
pub async fn notify_user(pool: &DbPool, user_id: DbId, message: &str) -> bool {
    match NotificationRepo::create(pool, user_id, message).await {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(user_id, error = %err, "Failed to store notification");
            false
        }
    }
}

/// Message for a vehicle entering a lot.
pub fn entry_message(license_plate: &str, slot_code: &str) -> String {
    format!("Your vehicle ({license_plate}) entered the parking lot at slot {slot_code}")
}

/// Message for a vehicle leaving a lot, including the computed fee.
pub fn exit_message(license_plate: &str, total_fee: i64) -> String {
    format!("Your vehicle ({license_plate}) left the parking lot. Fee: {total_fee}")
}
