pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const MONGO_MIN_POOL_SIZE: u32 = 5;
pub const MONGO_MAX_POOL_SIZE: u32 = 10;
pub const MONGO_CONN_TIMEOUT: u64 = 10;
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";

pub const OTP_LENGTH: u32 = 6;
pub const OTP_VALIDITY_MINS: u64 = 10;
pub const OTP_STORE_CAPACITY: u64 = 100_000;
pub const JWT_EXPIRY_SECS: u64 = 7 * 24 * 3600;
pub const DEFAULT_USER_TYPE: &str = "seller";
pub const ADMIN_USER_TYPE: &str = "admin";

pub const REVIEW_DEFAULT_TARGET_TYPE: &str = "property";
pub const REVIEW_DEFAULT_LIMIT: i64 = 20;
pub const REVIEW_ADMIN_DEFAULT_LIMIT: i64 = 50;

pub const WATERMARK_TEXT: &str = "AshishProperties.in";
pub const WATERMARK_MIN_DIMENSION: u32 = 120;
pub const WATERMARK_FONT_PX: u32 = 12;
pub const WATERMARK_MARGIN_PX: u32 = 8;
pub const WATERMARK_FETCH_TIMEOUT_SECS: u64 = 15;
pub const WATERMARK_CACHE_CAPACITY: u64 = 256;
pub const WATERMARK_CACHE_TTL_SECS: u64 = 60 * 60;
pub const WATERMARK_MAX_SOURCE_BYTES: usize = 16 * 1024 * 1024;
pub const WATERMARK_TRACKER_CAPACITY: u64 = 10_000;
pub const WATERMARK_TRACKER_TTL_SECS: u64 = 24 * 60 * 60;
pub const WATERMARK_JOB_INTERVAL: u64 = 5;
pub const WATERMARK_JOB_BATCH: usize = 16;

pub const AWS_REGION: &str = "ap-south-1";
pub const AWS_BUCKET: &str = "ashish-property-listings";
pub const MULTIPART_BODY_LIMIT: usize = 25 * 1024 * 1024;
pub const CLEANUP_JOB_INTERVAL: u64 = 5 * 60;

pub const MAIL_SUBJECT_OTP: &str = "Your OTP | Ashish Property";
pub const SITE_NAME: &str = "Aashish Property";
pub const SITE_CONTACT_EMAIL: &str = "support@aashishproperty.com";
pub const SITE_CONTACT_PHONE: &str = "+91 9876543210";
pub const SITE_ADDRESS: &str = "Rohtak, Haryana, India";

pub const DB_NAME: &str = "ashish_property";

pub const COLL_USERS: &str = "users";
pub const COLL_REVIEWS: &str = "reviews";
pub const COLL_SETTINGS: &str = "settings";

pub const SETTINGS_DOC_KEY: &str = "public";
