use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::{
    models::*,
    state::AppState,
    utils::{AppError, ValidatedQuery},
    watermark::{
        fetch_source, process_blocking, ImageStatus, WatermarkOutcome, WatermarkStyle,
    },
};

/// Watermark a remote image on demand
///
/// Returns the watermarked PNG. When the image cannot be fetched or decoded
/// the overlay description is returned as JSON instead, and small or opted-out
/// images are reported as skipped.
#[utoipa::path(
    get,
    path = "/api/watermark",
    params(WatermarkQuery),
    responses(
        (status = StatusCode::OK, description = "Watermarked PNG", content_type = "image/png", body = Vec<u8>),
        (status = StatusCode::ACCEPTED, description = "Overlay fallback or skipped image", body = WatermarkFallbackResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid source or style", body = ErrorResponse),
    ),
    tag = "Watermark API"
)]
pub async fn watermark_handler(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(params): ValidatedQuery<WatermarkQuery>,
) -> Result<Response, AppError> {
    let style = match params.style.as_deref() {
        Some(style) => style
            .parse::<WatermarkStyle>()
            .map_err(|err| AppError::BadRequestErr(err.to_string()))?,
        None => state.watermarker.config().style,
    };
    let watermarker = state.watermarker.with_style(style);
    let size = params.width.zip(params.height);
    let outcome = match watermarker.skip_reason(params.opt_out, size) {
        Some(reason) => WatermarkOutcome::Skipped(reason),
        None => {
            let fetched = fetch_source(&state.http, &params.src, watermarker.config()).await;
            process_blocking(watermarker, params.opt_out, size, fetched).await?
        }
    };
    let data = match outcome {
        WatermarkOutcome::Baked(png) => {
            let headers = [
                (header::CONTENT_TYPE, "image/png"),
                (header::CACHE_CONTROL, "public, max-age=3600"),
            ];
            return Ok((headers, png).into_response());
        }
        WatermarkOutcome::Overlay(overlay) => ImageStatus::Overlay { overlay },
        WatermarkOutcome::Skipped(reason) => ImageStatus::Skipped { reason },
    };
    tracing::debug!("no baked image for {}: {:?}", params.src, data);
    let res = WatermarkFallbackResponse {
        success: true,
        data,
    };
    Ok((axum::http::StatusCode::ACCEPTED, Json(res)).into_response())
}
