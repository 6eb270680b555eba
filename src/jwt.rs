use axum::{
    async_trait,
    extract::FromRequestParts,
    headers::{authorization::Bearer, Authorization},
    http::request::Parts,
    RequestPartsExt, TypedHeader,
};
use jsonwebtoken::{
    decode, encode, errors::Result as JwtResult, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    constants::*,
    state::AppState,
    utils::{get_epoch_ts, AppError},
};

pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign a bearer token valid for seven days
    pub fn generate_token(&self, user_id: &str, user_type: &str, email: &str) -> JwtResult<String> {
        let exp = get_epoch_ts() + JWT_EXPIRY_SECS;
        let claims = JwtClaims::new(user_id, user_type, email, exp as usize);
        self.sign(&claims)
    }

    fn sign(&self, claims: &JwtClaims) -> JwtResult<String> {
        encode(&Header::default(), claims, &self.encoding)
    }

    /// Decode and validate a token, `None` for anything invalid or expired
    pub fn extract_claims(&self, token: &str) -> Option<JwtClaims> {
        decode::<JwtClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtClaims {
    pub user_id: String,
    pub user_type: String,
    pub email: String,
    pub exp: usize,
}

impl JwtClaims {
    fn new(user_id: &str, user_type: &str, email: &str, exp: usize) -> Self {
        Self {
            user_id: user_id.to_owned(),
            user_type: user_type.to_owned(),
            email: email.to_owned(),
            exp,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user_type == ADMIN_USER_TYPE
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for JwtClaims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Auth("Missing token".into()))?;
        state
            .jwt_keys
            .extract_claims(bearer.token())
            .ok_or(AppError::Auth("Invalid Token".into()))
    }
}

/// Claims of an authenticated admin user
#[derive(Debug, Clone)]
pub struct AdminClaims(pub JwtClaims);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminClaims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let claims = JwtClaims::from_request_parts(parts, state).await?;
        if !claims.is_admin() {
            return Err(AppError::Forbidden("Admin access required".into()));
        }
        Ok(Self(claims))
    }
}
