//! Background pruning of revocation records whose tokens have expired.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::db::RevocationStore;
use crate::error::Result;
use crate::security::jwt::MAX_LEEWAY_SECS;

/// Purge records that can no longer matter.
///
/// The cutoff is `now - leeway`, so a removed jti belongs to a token that
/// `check_expiry` already rejects.
pub async fn purge_once(
    store: &dyn RevocationStore,
    now: DateTime<Utc>,
    leeway_secs: u64,
) -> Result<u64> {
    let cutoff = now - ChronoDuration::seconds(leeway_secs.min(MAX_LEEWAY_SECS) as i64);
    let removed = store.purge_expired(cutoff).await?;
    if removed > 0 {
        tracing::info!(removed, cutoff = %cutoff, "Pruned expired revocation records");
    }
    Ok(removed)
}

pub fn spawn_revocation_cleanup(
    store: Arc<dyn RevocationStore>,
    interval: Duration,
    leeway_secs: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // First tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = purge_once(store.as_ref(), Utc::now(), leeway_secs).await {
                tracing::warn!(error = %e, "Revocation cleanup failed");
            }
        }
    })
}
