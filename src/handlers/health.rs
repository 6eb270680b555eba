use axum::{
    http::{StatusCode, Uri},
    response::IntoResponse,
    Json,
};

use crate::models::{ErrorResponse, GenericResponse};

/// Root route, answers as long as the process is up
pub async fn default_route_handler() -> Json<GenericResponse> {
    Json(GenericResponse {
        success: true,
        message: "Listings API is running".to_owned(),
    })
}

/// Ping endpoint
///
/// Ping the server to get a static response
#[utoipa::path(
    get,
    path = "/api/v1/ping",
    responses(
        (status = 200, description = "Get success response from server", body = GenericResponse)
    ),
    tag = "Debugging API"
)]
pub async fn ping_handler() -> Json<GenericResponse> {
    Json(GenericResponse {
        success: true,
        message: "pong".to_owned(),
    })
}

/// Fallback for every unknown route
pub async fn global_404_handler(uri: Uri) -> impl IntoResponse {
    let msg = format!("Route `{}` does not exist", uri);
    tracing::debug!(msg);
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new(msg)))
}
