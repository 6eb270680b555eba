use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    utils::{deserialize_otp, validate_target_type},
    watermark::ObservedImage,
};

use super::{ContactSettings, GeneralSettings, ReviewStatus};

/// request body schema for requesting an email otp
///
/// The email is trimmed and checked by the handler, so padded addresses
/// are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RequestOtpReq {
    pub email: Option<String>,
}

/// request body schema for verifying an email otp
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct VerifyOtpReq {
    pub email: Option<String>,
    /// accepted as a string or a number
    #[serde(default, deserialize_with = "deserialize_otp")]
    #[schema(value_type = Option<String>, example = "482913")]
    pub otp: Option<String>,
}

/// query params for listing public reviews
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ListReviewsQuery {
    #[validate(length(min = 1, max = 100, message = "targetId is required"))]
    pub target_id: String,
    #[validate(custom(function = "validate_target_type"))]
    pub target_type: Option<String>,
    pub status: Option<ReviewStatus>,
    #[validate(range(min = 1, max = 200, message = "Invalid limit"))]
    pub limit: Option<i64>,
}

/// request body schema for submitting a review
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewReq {
    #[validate(length(min = 1, max = 100, message = "targetId is required"))]
    pub target_id: String,
    #[validate(custom(function = "validate_target_type"))]
    pub target_type: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: u8,
    #[validate(length(max = 120, message = "Title is too long"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1 to 2000 characters"))]
    pub comment: String,
    #[validate(length(max = 10, message = "Too many images"))]
    pub images: Option<Vec<String>>,
}

/// query params for the admin review listing
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminListReviewsQuery {
    pub status: Option<ReviewStatus>,
    #[validate(range(min = 1, max = 200, message = "Invalid limit"))]
    pub limit: Option<i64>,
}

/// request body schema for moderating a review
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModerateReviewReq {
    pub status: ReviewStatus,
    #[validate(length(max = 500, message = "Admin note is too long"))]
    pub admin_note: Option<String>,
}

/// request body schema for replacing the site settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateSettingsReq {
    #[serde(default)]
    #[validate]
    pub general: GeneralSettings,
    #[serde(default)]
    #[validate]
    pub contact: ContactSettings,
}

/// request body schema for reporting page images
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ObserveImagesReq {
    #[validate(length(min = 1, max = 100, message = "Between 1 and 100 images are accepted"))]
    pub images: Vec<ObservedImage>,
}

/// query params for on-demand watermarking
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct WatermarkQuery {
    #[validate(url(message = "Valid image url is required"))]
    pub src: String,
    pub style: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(default)]
    pub opt_out: bool,
}
