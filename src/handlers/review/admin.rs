use axum::{
    extract::{Path, State},
    Json,
};
use mongodb::{bson::doc, options::FindOptions};
use std::sync::Arc;

use crate::{
    constants::*,
    jwt::AdminClaims,
    models::*,
    state::AppState,
    utils::{get_epoch_ts, parse_object_id, AppError, ValidatedBody, ValidatedQuery},
};

/// List reviews for moderation
///
/// Defaults to pending reviews, oldest first so the queue is worked in order.
#[utoipa::path(
    get,
    path = "/api/admin/reviews",
    params(AdminListReviewsQuery),
    responses(
        (status = StatusCode::OK, description = "Reviews with the given status", body = ReviewListResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = StatusCode::FORBIDDEN, description = "Not an admin", body = ErrorResponse),
    ),
    tag = "Admin API",
    security(("authorization" = []))
)]
pub async fn admin_list_reviews_handler(
    State(state): State<Arc<AppState>>,
    AdminClaims(_claims): AdminClaims,
    ValidatedQuery(params): ValidatedQuery<AdminListReviewsQuery>,
) -> Result<Json<ReviewListResponse>, AppError> {
    let status = params.status.unwrap_or(ReviewStatus::Pending);
    let filter = doc! {"status": status.to_bson()};
    let options = FindOptions::builder()
        .sort(Some(doc! {"createdAt": 1}))
        .limit(Some(params.limit.unwrap_or(REVIEW_ADMIN_DEFAULT_LIMIT)))
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

/// Approve or reject a review
#[utoipa::path(
    patch,
    path = "/api/admin/reviews/{id}",
    params(("id" = String, Path, description = "Review id")),
    request_body = ModerateReviewReq,
    responses(
        (status = StatusCode::OK, description = "Review moderated", body = GenericResponse),
        (status = StatusCode::BAD_REQUEST, description = "Malformed id or status", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "Review not found", body = ErrorResponse),
        (status = StatusCode::FORBIDDEN, description = "Not an admin", body = ErrorResponse),
    ),
    tag = "Admin API",
    security(("authorization" = []))
)]
pub async fn moderate_review_handler(
    State(state): State<Arc<AppState>>,
    AdminClaims(claims): AdminClaims,
    Path(id): Path<String>,
    ValidatedBody(body): ValidatedBody<ModerateReviewReq>,
) -> Result<Json<GenericResponse>, AppError> {
    let oid = parse_object_id(&id, "Invalid review id")?;
    if body.status == ReviewStatus::Pending {
        return Err(AppError::BadRequestErr(
            "Status must be approved or rejected".into(),
        ));
    }
    let mut set = doc! {
        "status": body.status.to_bson(),
        "updatedAt": get_epoch_ts() as i64,
    };
    if let Some(note) = body.admin_note.as_deref().map(str::trim) {
        set.insert("adminNote", note);
    }
    let res = state
        .db
        .update_one(DB_NAME, COLL_REVIEWS, doc! {"_id": oid}, doc! {"$set": set}, None)
        .await?;
    if res.matched_count == 0 {
        return Err(AppError::NotFound("Review not found".into()));
    }
    tracing::debug!("review {id} {} by {}", body.status, claims.user_id);
    Ok(Json(GenericResponse {
        success: true,
        message: format!("Review {}", body.status),
    }))
}
