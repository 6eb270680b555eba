pub mod image;
pub mod observe;
pub mod on_demand;
pub mod status;

/// Where the baked copy of a tracked image is served
fn baked_image_url(id: &str) -> String {
    format!("/api/watermark/image/{id}")
}
