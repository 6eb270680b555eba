use axum::{extract::State, Json};
use mongodb::{bson::doc, options::ReplaceOptions};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    constants::*,
    jwt::AdminClaims,
    models::*,
    state::AppState,
    utils::{AppError, ValidatedBody},
};

/// Stored shape of the settings document
#[derive(Debug, Serialize)]
struct SettingsDoc<'a> {
    key: &'a str,
    #[serde(flatten)]
    settings: &'a SiteSettings,
}

/// Replace the site settings
#[utoipa::path(
    put,
    path = "/api/admin/settings",
    request_body = UpdateSettingsReq,
    responses(
        (status = StatusCode::OK, description = "Settings saved", body = SettingsResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid settings", body = ErrorResponse),
        (status = StatusCode::FORBIDDEN, description = "Not an admin", body = ErrorResponse),
    ),
    tag = "Admin API",
    security(("authorization" = []))
)]
pub async fn update_settings_handler(
    State(state): State<Arc<AppState>>,
    AdminClaims(claims): AdminClaims,
    ValidatedBody(body): ValidatedBody<UpdateSettingsReq>,
) -> Result<Json<SettingsResponse>, AppError> {
    let settings = SiteSettings {
        general: body.general,
        contact: body.contact,
        updated_at: Some(chrono::Utc::now().to_rfc3339()),
    };
    let doc = SettingsDoc {
        key: SETTINGS_DOC_KEY,
        settings: &settings,
    };
    let options = ReplaceOptions::builder().upsert(Some(true)).build();
    state
        .db
        .replace_one(
            DB_NAME,
            COLL_SETTINGS,
            doc! {"key": SETTINGS_DOC_KEY},
            &doc,
            Some(options),
        )
        .await?;
    tracing::debug!("site settings updated by {}", claims.user_id);
    let resolved = settings.resolve_contact();
    Ok(Json(SettingsResponse {
        success: true,
        data: settings,
        resolved,
    }))
}
