use axum::{extract::State, Json};
use std::sync::Arc;

use super::load_settings;
use crate::{models::*, state::AppState, utils::AppError};

/// Public site settings
///
/// Settings used by the informational pages together with the resolved contact details.
#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = StatusCode::OK, description = "Site settings", body = SettingsResponse),
    ),
    tag = "Settings API"
)]
pub async fn get_settings_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SettingsResponse>, AppError> {
    let settings = load_settings(&state.db).await?;
    let resolved = settings.resolve_contact();
    Ok(Json(SettingsResponse {
        success: true,
        data: settings,
        resolved,
    }))
}
