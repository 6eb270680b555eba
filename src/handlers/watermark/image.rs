use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::{state::AppState, utils::AppError};

/// Baked copy of a tracked image
#[utoipa::path(
    get,
    path = "/api/watermark/image/{id}",
    params(("id" = String, Path, description = "Image id used when observing")),
    responses(
        (status = StatusCode::OK, description = "Watermarked PNG", content_type = "image/png", body = Vec<u8>),
        (status = StatusCode::NOT_FOUND, description = "No baked copy available", body = ErrorResponse),
    ),
    tag = "Watermark API"
)]
pub async fn baked_image_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = state
        .baked_images
        .get(&id)
        .ok_or(AppError::NotFound("No watermarked image available".into()))?;
    let headers = [
        (header::CONTENT_TYPE, "image/png"),
        (header::CACHE_CONTROL, "public, max-age=3600"),
    ];
    Ok((headers, bytes.to_vec()))
}
