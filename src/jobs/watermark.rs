use std::{sync::Arc, time::Duration};
use tokio::time::interval;

use crate::{
    constants::*,
    state::AppState,
    watermark::{fetch_source, process_blocking, tracker::PendingImage, WatermarkOutcome},
};

/// Drains the image tracker's queue, baking the mark into each observed image
pub async fn watermark_job(state: Arc<AppState>) {
    tracing::debug!("initializing watermark scheduler job");
    let mut interval = interval(Duration::from_secs(WATERMARK_JOB_INTERVAL));
    loop {
        interval.tick().await;
        process_batch(&state).await;
    }
}

/// Watermark one batch of queued images
pub async fn process_batch(state: &Arc<AppState>) {
    let batch = state.image_tracker.next_batch(WATERMARK_JOB_BATCH);
    if batch.is_empty() {
        return;
    }
    tracing::debug!("watermarking {} images", batch.len());
    let tasks = batch
        .into_iter()
        .map(|job| process_image(state, job))
        .collect::<Vec<_>>();
    futures::future::join_all(tasks).await;
}

async fn process_image(state: &Arc<AppState>, job: PendingImage) {
    let fetched = fetch_source(&state.http, &job.src, state.watermarker.config()).await;
    let size = Some((job.width, job.height));
    let outcome = match process_blocking(state.watermarker.clone(), false, size, fetched).await {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::debug!("watermark task for {} failed: {:?}", job.id, err);
            state.image_tracker.requeue(&job.id);
            return;
        }
    };
    if let WatermarkOutcome::Baked(png) = &outcome {
        // only the newest source of an image may fill the cache
        if state.image_tracker.src(&job.id).as_deref() == Some(job.src.as_str()) {
            state.baked_images.insert(job.id.clone(), Arc::new(png.clone()));
        }
    }
    if !state.image_tracker.complete(&job, &outcome) {
        tracing::debug!("image {} changed while it was processed", job.id);
    }
}
