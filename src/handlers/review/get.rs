use axum::{extract::State, Json};
use mongodb::{bson::doc, options::FindOptions};
use std::sync::Arc;

use crate::{
    constants::*,
    models::*,
    state::AppState,
    utils::{AppError, ValidatedQuery},
};

/// List approved reviews
///
/// Public listing of the approved reviews of one target, newest first.
#[utoipa::path(
    get,
    path = "/api/reviews",
    params(ListReviewsQuery),
    responses(
        (status = StatusCode::OK, description = "Approved reviews", body = ReviewListResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid query", body = ErrorResponse),
    ),
    tag = "Review API"
)]
pub async fn get_reviews_handler(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(params): ValidatedQuery<ListReviewsQuery>,
) -> Result<Json<ReviewListResponse>, AppError> {
    let status = params.status.unwrap_or(ReviewStatus::Approved);
    if status != ReviewStatus::Approved {
        return Err(AppError::BadRequestErr(
            "Only approved reviews are public".into(),
        ));
    }
    let target_type = params
        .target_type
        .as_deref()
        .unwrap_or(REVIEW_DEFAULT_TARGET_TYPE);
    let filter = doc! {
        "targetId": &params.target_id,
        "targetType": target_type,
        "status": status.to_bson(),
    };
    let options = FindOptions::builder()
        .sort(Some(doc! {"createdAt": -1}))
        .limit(Some(params.limit.unwrap_or(REVIEW_DEFAULT_LIMIT)))
        .build();
    let reviews = state
        .db
        .find::<Review>(DB_NAME, COLL_REVIEWS, Some(filter), Some(options))
        .await?;
    let data = reviews.into_iter().map(ReviewData::from).collect();
    Ok(Json(ReviewListResponse {
        success: true,
        data,
    }))
}
