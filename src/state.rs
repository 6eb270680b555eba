use moka::sync::Cache;
use std::{sync::Arc, time::Duration};

use crate::{
    config::AppConfig,
    constants::*,
    database::AppDatabase,
    jwt::JwtKeys,
    mailer::{mailer_from_config, Mailer},
    otp_store::OtpStore,
    watermark::{fetch_client, ImageTracker, WatermarkConfig, Watermarker},
};

/// Shared state handed to every handler and background job
pub struct AppState {
    pub config: AppConfig,
    pub db: Arc<AppDatabase>,
    pub jwt_keys: JwtKeys,
    pub otp_store: OtpStore,
    pub mailer: Box<dyn Mailer>,
    pub watermarker: Watermarker,
    pub image_tracker: ImageTracker,
    /// Baked PNG bytes by tracked image id
    pub baked_images: Cache<String, Arc<Vec<u8>>>,
    pub http: reqwest::Client,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let db = AppDatabase::new(&config).await?;
        let mailer = mailer_from_config(&config.mail)?;
        Self::with_parts(config, Arc::new(db), mailer)
    }

    /// Build the state around an existing database handle and mail sender
    pub fn with_parts(
        config: AppConfig,
        db: Arc<AppDatabase>,
        mailer: Box<dyn Mailer>,
    ) -> anyhow::Result<Self> {
        let jwt_keys = JwtKeys::new(&config.jwt_secret);
        let watermarker = Watermarker::new(WatermarkConfig::from(&config.watermark));
        let image_tracker = ImageTracker::for_watermarker(&watermarker);
        let baked_images = Cache::builder()
            .max_capacity(WATERMARK_CACHE_CAPACITY)
            .time_to_live(Duration::from_secs(WATERMARK_CACHE_TTL_SECS))
            .build();
        Ok(Self {
            config,
            db,
            jwt_keys,
            otp_store: OtpStore::default(),
            mailer,
            watermarker,
            image_tracker,
            baked_images,
            http: fetch_client()?,
        })
    }
}
