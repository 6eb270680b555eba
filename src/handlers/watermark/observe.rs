use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

use crate::{
    models::*,
    state::AppState,
    utils::{first_validation_message, AppError, ValidatedBody},
};

/// Report page images for watermarking
///
/// Eligible images are queued for the watermark worker. Reporting an image
/// again is a no-op unless its `src` changed.
#[utoipa::path(
    post,
    path = "/api/watermark/observe",
    request_body = ObserveImagesReq,
    responses(
        (status = StatusCode::OK, description = "Result per reported image", body = ObserveImagesResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid images", body = ErrorResponse),
    ),
    tag = "Watermark API"
)]
pub async fn observe_images_handler(
    State(state): State<Arc<AppState>>,
    ValidatedBody(body): ValidatedBody<ObserveImagesReq>,
) -> Result<Json<ObserveImagesResponse>, AppError> {
    for image in body.images.iter() {
        image
            .validate()
            .map_err(|err| AppError::BadRequestErr(first_validation_message(&err)))?;
    }
    let data = body
        .images
        .iter()
        .map(|image| ObservedImageResult {
            id: image.id.clone(),
            result: state.image_tracker.observe(image),
        })
        .collect::<Vec<_>>();
    tracing::debug!(
        "{} images observed, {} queued for watermarking",
        data.len(),
        state.image_tracker.queued()
    );
    Ok(Json(ObserveImagesResponse {
        success: true,
        data,
    }))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        routing::post,
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::{mailer::MemoryMailer, state::test_support::test_state};

    fn request(body: &str) -> Request<Body> {
        Request::builder()
            .uri("/observe")
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_observe_reports_each_image() {
        let state = test_state(Arc::new(MemoryMailer::default())).await;
        let app = Router::new()
            .route("/observe", post(observe_images_handler))
            .with_state(state.clone());
        let body = r#"{"images":[
            {"id":"hero","src":"https://cdn.site/hero.jpg","width":1200,"height":800},
            {"id":"logo","src":"https://cdn.site/logo.png","width":48,"height":48},
            {"id":"map","src":"https://cdn.site/map.png","width":600,"height":400,"optOut":true}
        ]}"#;
        let res = app.clone().oneshot(request(body)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body_bytes = hyper::body::to_bytes(res.into_body()).await.unwrap();
        let res: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(res["success"], true);
        assert_eq!(res["data"][0]["id"], "hero");
        assert_eq!(res["data"][0]["result"], "queued");
        assert_eq!(res["data"][1]["result"], "skipped");
        assert_eq!(res["data"][1]["reason"], "tooSmall");
        assert_eq!(res["data"][2]["reason"], "optedOut");
        assert_eq!(state.image_tracker.queued(), 1);

        let res = app.oneshot(request(body)).await.unwrap();
        let body_bytes = hyper::body::to_bytes(res.into_body()).await.unwrap();
        let res: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(res["data"][0]["result"], "unchanged");
        assert_eq!(state.image_tracker.queued(), 1);
    }

    #[tokio::test]
    async fn test_invalid_image_is_rejected() {
        let state = test_state(Arc::new(MemoryMailer::default())).await;
        let app = Router::new()
            .route("/observe", post(observe_images_handler))
            .with_state(state.clone());
        let res = app.clone().oneshot(request(r#"{"images":[]}"#)).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = r#"{"images":[{"id":"a","src":"not a url","width":500,"height":500}]}"#;
        let res = app.oneshot(request(body)).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.image_tracker.queued(), 0);
    }
}
