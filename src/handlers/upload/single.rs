use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;

use super::{png_file_name, uniq_file_name};
use crate::{
    models::*,
    state::AppState,
    utils::{get_object_url, AppError},
    watermark::{process_blocking, WatermarkOutcome},
};

/// Upload a listing photo
///
/// Images are watermarked before they are stored so downloads carry the mark.
/// Files that are not images, or are too small, are stored as they are.
#[utoipa::path(
    post,
    path = "/api/v1/upload/single",
    responses(
        (status = StatusCode::OK, description = "upload successful", body = FileUploadRes),
        (status = StatusCode::BAD_REQUEST, description = "Bad request", body = ErrorResponse),
    ),
    tag = "Upload API"
)]
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    mut files: Multipart,
) -> Result<Json<FileUploadRes>, AppError> {
    let file = files
        .next_field()
        .await?
        .ok_or(AppError::BadRequestErr("no file".into()))?;
    let file_name = file
        .file_name()
        .ok_or(AppError::BadRequestErr("unable to read file name".into()))?
        .to_string();
    let data = file.bytes().await.map_err(|err| {
        tracing::debug!("{:?}", err);
        AppError::BadRequestErr("unable to read file content".into())
    })?;
    let watermarker = state.watermarker.clone();
    let outcome = process_blocking(watermarker, false, None, Ok(data.to_vec())).await?;
    let (body, file_name, content_type, watermarked) = match outcome {
        WatermarkOutcome::Baked(png) => (png, png_file_name(&file_name), "image/png", true),
        other => {
            tracing::debug!("upload {file_name} stored without watermark: {:?}", other);
            (data.to_vec(), file_name, "application/octet-stream", false)
        }
    };
    let aws_config = aws_config::from_env()
        .region(aws_sdk_s3::Region::new(state.config.aws_region.clone()))
        .load()
        .await;
    let client = aws_sdk_s3::Client::new(&aws_config);
    let key = uniq_file_name(&file_name);
    let resp = client
        .put_object()
        .bucket(&state.config.aws_bucket)
        .key(&key)
        .content_type(content_type)
        .body(body.into())
        .send()
        .await?;
    tracing::debug!("{:?}", resp);
    let e_tag = resp
        .e_tag
        .ok_or(anyhow::anyhow!("unable to get ETag value"))?;
    let url = get_object_url(&state.config.aws_bucket, &state.config.aws_region, &key);
    let res = FileUploadRes {
        success: true,
        e_tag,
        url,
        watermarked,
    };
    Ok(Json(res))
}
