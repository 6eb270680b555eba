use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::{
    constants::*,
    jwt::JwtClaims,
    models::*,
    state::AppState,
    utils::{get_epoch_ts, AppError, ValidatedBody},
};

/// Submit a review
///
/// The review is stored as pending until an admin approves it.
#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = CreateReviewReq,
    responses(
        (status = StatusCode::CREATED, description = "Review submitted", body = CreateReviewResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid review", body = ErrorResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
    ),
    tag = "Review API",
    security(("authorization" = []))
)]
pub async fn create_review_handler(
    State(state): State<Arc<AppState>>,
    claims: JwtClaims,
    ValidatedBody(body): ValidatedBody<CreateReviewReq>,
) -> Result<(StatusCode, Json<CreateReviewResponse>), AppError> {
    let ts = get_epoch_ts();
    let title = body
        .title
        .map(|title| title.trim().to_owned())
        .filter(|title| !title.is_empty());
    let review = Review {
        id: None,
        target_id: body.target_id,
        target_type: body.target_type,
        rating: body.rating,
        title,
        comment: body.comment.trim().to_owned(),
        images: body.images.unwrap_or_default(),
        status: ReviewStatus::Pending,
        user_id: claims.user_id,
        admin_note: None,
        created_at: ts,
        updated_at: ts,
    };
    if review.comment.is_empty() {
        return Err(AppError::BadRequestErr(
            "Comment must be 1 to 2000 characters".into(),
        ));
    }
    let res = state
        .db
        .insert_one::<Review>(DB_NAME, COLL_REVIEWS, &review, None)
        .await?;
    let id = res
        .inserted_id
        .as_object_id()
        .map(|oid| oid.to_hex())
        .ok_or(anyhow::anyhow!("unable to read inserted review id"))?;
    tracing::debug!("review {id} submitted by {}", review.user_id);
    let res = CreateReviewResponse {
        success: true,
        data: CreatedReview {
            id,
            status: ReviewStatus::Pending,
        },
    };
    Ok((StatusCode::CREATED, Json(res)))
}
