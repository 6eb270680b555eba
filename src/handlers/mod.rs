pub mod email_otp;
pub mod health;
pub mod review;
pub mod settings;
pub mod upload;
pub mod watermark;

pub use email_otp::request::request_otp_handler;
pub use email_otp::verify::find_or_create_user;
pub use email_otp::verify::verify_otp_handler;

pub use health::default_route_handler;
pub use health::global_404_handler;
pub use health::ping_handler;

pub use review::admin::admin_list_reviews_handler;
pub use review::admin::moderate_review_handler;
pub use review::create::create_review_handler;
pub use review::get::get_reviews_handler;

pub use settings::get::get_settings_handler;
pub use settings::load_settings;
pub use settings::update::update_settings_handler;

pub use upload::single::upload_handler;

pub use watermark::image::baked_image_handler;
pub use watermark::observe::observe_images_handler;
pub use watermark::on_demand::watermark_handler;
pub use watermark::status::image_status_handler;
