use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::ping_handler,
        crate::handlers::email_otp::request::request_otp_handler,
        crate::handlers::email_otp::verify::verify_otp_handler,
        crate::handlers::review::get::get_reviews_handler,
        crate::handlers::review::create::create_review_handler,
        crate::handlers::review::admin::admin_list_reviews_handler,
        crate::handlers::review::admin::moderate_review_handler,
        crate::handlers::settings::get::get_settings_handler,
        crate::handlers::settings::update::update_settings_handler,
        crate::handlers::watermark::observe::observe_images_handler,
        crate::handlers::watermark::status::image_status_handler,
        crate::handlers::watermark::image::baked_image_handler,
        crate::handlers::watermark::on_demand::watermark_handler,
        crate::handlers::upload::single::upload_handler,
    ),
    components(
        schemas(
            crate::models::RequestOtpReq,
            crate::models::VerifyOtpReq,
            crate::models::CreateReviewReq,
            crate::models::ModerateReviewReq,
            crate::models::UpdateSettingsReq,
            crate::models::ObserveImagesReq,

            crate::models::GenericResponse,
            crate::models::ErrorResponse,
            crate::models::MessageData,
            crate::models::RequestOtpResponse,
            crate::models::LoginData,
            crate::models::VerifyOtpResponse,
            crate::models::ReviewListResponse,
            crate::models::CreatedReview,
            crate::models::CreateReviewResponse,
            crate::models::SettingsResponse,
            crate::models::ObserveImagesResponse,
            crate::models::ImageStatusResponse,
            crate::models::WatermarkFallbackResponse,
            crate::models::FileUploadRes,

            crate::models::UserProfile,
            crate::models::ReviewData,
            crate::models::ReviewStatus,
            crate::models::SiteSettings,
            crate::models::GeneralSettings,
            crate::models::ContactSettings,
            crate::models::ResolvedContact,
            crate::watermark::ObservedImage,
            crate::watermark::OverlaySpec,
            crate::watermark::WatermarkStyle,
            crate::watermark::SkipReason,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Debugging API", description = "API for debugging purposes"),
        (name = "Auth API", description = "Email OTP login"),
        (name = "Review API", description = "Public reviews and review submission"),
        (name = "Settings API", description = "Public site settings"),
        (name = "Watermark API", description = "Listing photo watermarking"),
        (name = "Upload API", description = "Listing photo uploads"),
        (name = "Admin API", description = "API for admin functionalities")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "authorization",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("authorization"))),
            )
        }
    }
}
