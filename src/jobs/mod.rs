use std::sync::Arc;

use self::{cleanup::cleanup_job, watermark::watermark_job};
use crate::state::AppState;

pub mod cleanup;
pub mod watermark;

pub fn spawn_all_jobs(state: Arc<AppState>) {
    {
        let state = state.clone();
        // spawn job to sweep expired one-time codes
        tokio::spawn(async {
            cleanup_job(state).await;
        });
    }

    tokio::spawn(async {
        // spawn job which watermarks the observed images
        watermark_job(state).await;
    });
}
