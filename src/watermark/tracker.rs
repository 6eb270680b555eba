use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard},
    time::Duration,
};
use utoipa::ToSchema;
use validator::Validate;

use super::{OverlaySpec, SkipReason, WatermarkOutcome, Watermarker};
use crate::constants::*;

/// An image reported by a page
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObservedImage {
    #[validate(length(min = 1, max = 200))]
    pub id: String,
    #[validate(url)]
    pub src: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub opt_out: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "result", content = "reason")]
pub enum ObserveResult {
    Queued,
    /// already queued or processed for the same source
    Unchanged,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum ImageStatus {
    Pending,
    Processing,
    Baked,
    Overlay { overlay: OverlaySpec },
    Skipped { reason: SkipReason },
}

/// A unit of work handed to the watermark worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImage {
    pub id: String,
    pub src: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
struct TrackedImage {
    src: String,
    width: u32,
    height: u32,
    status: ImageStatus,
}

/// Keeps track of the images pages have reported and which of them still
/// need watermarking.
///
/// Every eligible image is queued once. Reporting it again with the same
/// `src` is a no-op; a different `src` resets it and queues it again.
/// Opted-out and small images are recorded as skipped and never queued.
///
/// Per-image state lives in a bounded cache with a TTL, and the queue holds
/// at most as many ids as the cache, dropping the oldest when full.
pub struct ImageTracker {
    min_dimension: u32,
    max_queued: usize,
    images: Cache<String, TrackedImage>,
    queue: Mutex<VecDeque<String>>,
}

impl ImageTracker {
    pub fn new(min_dimension: u32) -> Self {
        let ttl = Duration::from_secs(WATERMARK_TRACKER_TTL_SECS);
        Self::with_capacity(min_dimension, WATERMARK_TRACKER_CAPACITY, ttl)
    }

    pub fn with_capacity(min_dimension: u32, capacity: u64, ttl: Duration) -> Self {
        let images = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self {
            min_dimension,
            max_queued: capacity as usize,
            images,
            queue: Mutex::new(VecDeque::new()),
        }
    }

    pub fn for_watermarker(watermarker: &Watermarker) -> Self {
        Self::new(watermarker.config().min_dimension)
    }

    // the queue lock also serialises every read-modify-write on `images`
    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn enqueue(&self, queue: &mut VecDeque<String>, id: &str) {
        if queue.iter().any(|queued| queued == id) {
            return;
        }
        if queue.len() >= self.max_queued {
            if let Some(dropped) = queue.pop_front() {
                self.images.invalidate(&dropped);
            }
        }
        queue.push_back(id.to_owned());
    }

    pub fn observe(&self, image: &ObservedImage) -> ObserveResult {
        let skip = if image.opt_out {
            Some(SkipReason::OptedOut)
        } else if image.width < self.min_dimension || image.height < self.min_dimension {
            Some(SkipReason::TooSmall)
        } else {
            None
        };
        let tracked = |status| TrackedImage {
            src: image.src.clone(),
            width: image.width,
            height: image.height,
            status,
        };
        let mut queue = self.lock();
        if let Some(reason) = skip {
            self.images
                .insert(image.id.clone(), tracked(ImageStatus::Skipped { reason }));
            queue.retain(|id| id != &image.id);
            return ObserveResult::Skipped(reason);
        }
        if let Some(current) = self.images.get(&image.id) {
            let skipped = matches!(current.status, ImageStatus::Skipped { .. });
            if current.src == image.src && !skipped {
                return ObserveResult::Unchanged;
            }
        }
        // make room in the queue before the new entry counts against the cache
        self.enqueue(&mut queue, &image.id);
        self.images
            .insert(image.id.clone(), tracked(ImageStatus::Pending));
        ObserveResult::Queued
    }

    /// Take up to `max` queued images and mark them as processing
    pub fn next_batch(&self, max: usize) -> Vec<PendingImage> {
        let mut queue = self.lock();
        let mut batch = Vec::new();
        while batch.len() < max {
            let Some(id) = queue.pop_front() else {
                break;
            };
            // evicted while waiting
            let Some(mut tracked) = self.images.get(&id) else {
                continue;
            };
            tracked.status = ImageStatus::Processing;
            batch.push(PendingImage {
                id: id.clone(),
                src: tracked.src.clone(),
                width: tracked.width,
                height: tracked.height,
            });
            self.images.insert(id, tracked);
        }
        batch
    }

    /// Record the outcome for an image. Ignored when the image's `src`
    /// changed while it was being processed, since the new source is queued.
    /// Returns whether the outcome was recorded.
    pub fn complete(&self, job: &PendingImage, outcome: &WatermarkOutcome) -> bool {
        let _queue = self.lock();
        let Some(mut tracked) = self.images.get(&job.id) else {
            return false;
        };
        if tracked.src != job.src {
            return false;
        }
        tracked.status = match outcome {
            WatermarkOutcome::Baked(_) => ImageStatus::Baked,
            WatermarkOutcome::Overlay(overlay) => ImageStatus::Overlay {
                overlay: overlay.clone(),
            },
            WatermarkOutcome::Skipped(reason) => ImageStatus::Skipped { reason: *reason },
        };
        self.images.insert(job.id.clone(), tracked);
        true
    }

    /// Queue a baked image again, e.g. after its bytes were evicted
    pub fn requeue(&self, id: &str) -> bool {
        let mut queue = self.lock();
        let Some(mut tracked) = self.images.get(id) else {
            return false;
        };
        if matches!(tracked.status, ImageStatus::Skipped { .. }) {
            return false;
        }
        tracked.status = ImageStatus::Pending;
        self.enqueue(&mut queue, id);
        self.images.insert(id.to_owned(), tracked);
        true
    }

    pub fn status(&self, id: &str) -> Option<ImageStatus> {
        self.images.get(id).map(|tracked| tracked.status)
    }

    pub fn src(&self, id: &str) -> Option<String> {
        self.images.get(id).map(|tracked| tracked.src)
    }

    pub fn queued(&self) -> usize {
        self.lock().len()
    }

    /// Number of images with recorded state, approximate until pending
    /// cache maintenance has run
    pub fn tracked(&self) -> u64 {
        self.images.entry_count()
    }

    pub fn run_pending_tasks(&self) {
        self.images.run_pending_tasks();
    }
}
