use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ResolvedContact, ReviewData, ReviewStatus, SiteSettings, UserProfile};
use crate::watermark::{ImageStatus, ObserveResult};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenericResponse {
    pub success: bool,
    pub message: String,
}

/// error envelope returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageData {
    pub message: String,
}

/// response schema for otp request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RequestOtpResponse {
    pub success: bool,
    pub data: MessageData,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginData {
    pub token: String,
    pub user: UserProfile,
}

/// response schema for otp verification
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub data: LoginData,
    pub message: String,
}

/// response schema for review listings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewListResponse {
    pub success: bool,
    pub data: Vec<ReviewData>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedReview {
    pub id: String,
    pub status: ReviewStatus,
}

/// response schema for review submission
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateReviewResponse {
    pub success: bool,
    pub data: CreatedReview,
}

/// response schema for public site settings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub success: bool,
    pub data: SiteSettings,
    pub resolved: ResolvedContact,
}

#[derive(Debug, Serialize)]
pub struct ObservedImageResult {
    pub id: String,
    #[serde(flatten)]
    pub result: ObserveResult,
}

/// response schema for image observation, one entry per reported image
#[derive(Debug, Serialize, ToSchema)]
pub struct ObserveImagesResponse {
    pub success: bool,
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<ObservedImageResult>,
}

/// response schema for the watermark state of a tracked image
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageStatusResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub data: ImageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// response schema for on-demand watermarking when no image is returned
#[derive(Debug, Serialize, ToSchema)]
pub struct WatermarkFallbackResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub data: ImageStatus,
}

/// response schema for a single upload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadRes {
    pub success: bool,
    pub e_tag: String,
    pub url: String,
    pub watermarked: bool,
}
