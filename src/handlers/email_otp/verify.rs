use axum::{extract::State, Json};
use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, ReturnDocument},
};
use std::sync::Arc;

use crate::{
    constants::*,
    database::AppDatabase,
    jwt::JwtKeys,
    models::*,
    state::AppState,
    utils::{get_epoch_ts, name_from_email, normalize_email, AppError, ValidatedBody},
};

/// Verify an email OTP
///
/// Consume the code, create the user on first login and return a signed token.
#[utoipa::path(
    post,
    path = "/api/email-otp/verify",
    request_body = VerifyOtpReq,
    responses(
        (status = StatusCode::OK, description = "OTP verified", body = VerifyOtpResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid or expired OTP", body = ErrorResponse),
    ),
    tag = "Auth API"
)]
pub async fn verify_otp_handler(
    State(state): State<Arc<AppState>>,
    ValidatedBody(body): ValidatedBody<VerifyOtpReq>,
) -> Result<Json<VerifyOtpResponse>, AppError> {
    let required = || AppError::BadRequestErr("Email and OTP are required".into());
    let email = body
        .email
        .as_deref()
        .map(normalize_email)
        .filter(|email| !email.is_empty())
        .ok_or_else(required)?;
    let otp = body
        .otp
        .as_deref()
        .map(str::trim)
        .filter(|otp| !otp.is_empty())
        .ok_or_else(required)?;
    if !state.otp_store.verify(&email, otp) {
        return Err(AppError::BadRequestErr("Invalid or expired OTP".into()));
    }
    let user = find_or_create_user(&state.db, &email).await?;
    let res = login_response(&state.jwt_keys, &user)?;
    tracing::debug!("user {} logged in with email otp", res.data.user.id);
    Ok(Json(res))
}

/// Sign a token for the user and wrap it with the profile
pub fn login_response(jwt_keys: &JwtKeys, user: &User) -> Result<VerifyOtpResponse, AppError> {
    let profile = UserProfile::from(user);
    let token = jwt_keys.generate_token(&profile.id, &profile.user_type, &profile.email)?;
    let res = VerifyOtpResponse {
        success: true,
        data: LoginData {
            token,
            user: profile,
        },
        message: "OTP verified".to_owned(),
    };
    Ok(res)
}

/// Find the user with the given email, creating it when absent.
/// A single upsert so concurrent first logins end up with one user.
pub async fn find_or_create_user(db: &AppDatabase, email: &str) -> anyhow::Result<User> {
    let ts = get_epoch_ts() as i64;
    let filter = doc! {"email": email};
    let update = doc! {
        "$setOnInsert": {
            "name": name_from_email(email),
            "phone": "",
            "userType": DEFAULT_USER_TYPE,
            "createdAt": ts,
            "updatedAt": ts,
        }
    };
    let options = FindOneAndUpdateOptions::builder()
        .upsert(Some(true))
        .return_document(Some(ReturnDocument::After))
        .build();
    let user = db
        .find_one_and_update::<User>(DB_NAME, COLL_USERS, filter, update, Some(options))
        .await?
        .ok_or(anyhow::anyhow!("user upsert returned nothing for {email}"))?;
    Ok(user)
}
