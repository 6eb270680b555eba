use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use super::baked_image_url;
use crate::{models::*, state::AppState, utils::AppError, watermark::ImageStatus};

/// Watermark state of a tracked image
///
/// A baked image whose bytes were evicted from the cache is queued again and
/// reported as pending.
#[utoipa::path(
    get,
    path = "/api/watermark/status/{id}",
    params(("id" = String, Path, description = "Image id used when observing")),
    responses(
        (status = StatusCode::OK, description = "Current state", body = ImageStatusResponse),
        (status = StatusCode::NOT_FOUND, description = "Image is not tracked", body = ErrorResponse),
    ),
    tag = "Watermark API"
)]
pub async fn image_status_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ImageStatusResponse>, AppError> {
    let status = state
        .image_tracker
        .status(&id)
        .ok_or(AppError::NotFound("Image is not tracked".into()))?;
    let (data, image_url) = match status {
        ImageStatus::Baked if state.baked_images.contains_key(&id) => {
            (ImageStatus::Baked, Some(baked_image_url(&id)))
        }
        ImageStatus::Baked => {
            tracing::debug!("baked image {id} was evicted, queueing again");
            state.image_tracker.requeue(&id);
            (ImageStatus::Pending, None)
        }
        other => (other, None),
    };
    Ok(Json(ImageStatusResponse {
        success: true,
        data,
        image_url,
    }))
}
