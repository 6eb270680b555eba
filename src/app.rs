use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
    Router,
};
use std::{sync::Arc, time::Duration};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{constants::*, handlers::*, state::AppState, swagger::ApiDoc};

/// Build the application router with every route, the fallback and the
/// shared middleware
pub fn build_app(state: Arc<AppState>) -> Router {
    tracing::debug!("Initializing the app");
    let api = Router::new()
        .route("/email-otp/request", post(request_otp_handler))
        .route("/email-otp/verify", post(verify_otp_handler))
        .route("/reviews", get(get_reviews_handler).post(create_review_handler))
        .route("/admin/reviews", get(admin_list_reviews_handler))
        .route("/admin/reviews/:id", patch(moderate_review_handler))
        .route("/settings", get(get_settings_handler))
        .route("/admin/settings", put(update_settings_handler))
        .route("/watermark", get(watermark_handler))
        .route("/watermark/observe", post(observe_images_handler))
        .route("/watermark/status/:id", get(image_status_handler))
        .route("/watermark/image/:id", get(baked_image_handler))
        .route("/v1/ping", get(ping_handler))
        .route(
            "/v1/upload/single",
            post(upload_handler).layer(DefaultBodyLimit::max(MULTIPART_BODY_LIMIT)),
        );

    Router::new()
        .route("/", get(default_route_handler))
        .nest("/api", api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(global_404_handler)
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
