//! Periodic deletion of expired session rows.
//!
//! Expired sessions are already unreadable; this job only reclaims storage.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use weatherapp_db::PgSessionStore;

/// Run the purge loop every `interval` until `cancel` is triggered.
pub async fn run(store: PgSessionStore, interval: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "Session purge job started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session purge job stopping");
                break;
            }
            _ = ticker.tick() => {
                match store.purge_expired().await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Session purge: removed expired sessions");
                        } else {
                            tracing::debug!("Session purge: nothing to remove");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Session purge: cleanup failed");
                    }
                }
            }
        }
    }
}
