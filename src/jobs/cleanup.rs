use std::{sync::Arc, time::Duration};
use tokio::time::interval;

use crate::{constants::*, state::AppState};

/// Periodically drops expired one-time codes, stale baked images and
/// expired image tracking state
pub async fn cleanup_job(state: Arc<AppState>) {
    tracing::debug!("initializing cleanup scheduler job");
    // CLEANUP_JOB_INTERVAL is mentioned in seconds
    let mut interval = interval(Duration::from_secs(CLEANUP_JOB_INTERVAL));
    loop {
        interval.tick().await;
        sweep(&state);
    }
}

fn sweep(state: &AppState) {
    state.otp_store.purge_expired();
    state.baked_images.run_pending_tasks();
    state.image_tracker.run_pending_tasks();
    tracing::debug!(
        "cleanup done, {} otp codes, {} baked images and {} tracked images remain",
        state.otp_store.len(),
        state.baked_images.entry_count(),
        state.image_tracker.tracked()
    );
}
