//! Periodic purge of expired and revoked refresh tokens.
//!
//! Spawns from the binary entrypoint and runs on a fixed interval
//! using `tokio::time::interval` until cancelled.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use parkview_db::repositories::RefreshTokenRepo;

/// How often the cleanup job runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the refresh-token cleanup loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        "Refresh token cleanup job started"
    );

    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Refresh token cleanup job stopping");
                break;
            }
            _ = interval.tick() => {
                match RefreshTokenRepo::delete_expired(&pool).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "Purged expired refresh tokens");
                    }
                    Ok(_) => {
                        tracing::debug!("No expired refresh tokens to purge");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Refresh token cleanup failed");
                    }
                }
            }
        }
    }
}
