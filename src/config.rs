use std::str::FromStr;

use crate::{constants::*, watermark::WatermarkStyle};

/// Runtime configuration collected from the environment (`.env` is loaded
/// by `dotenvy` before this is built). Every value has a usable default so
/// the server can start locally without any configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub mongodb_uri: String,
    pub mongodb_min_pool: u32,
    pub mongodb_max_pool: u32,
    pub jwt_secret: String,
    pub mail: MailConfig,
    pub watermark: WatermarkSettings,
    pub aws_region: String,
    pub aws_bucket: String,
}

#[derive(Debug, Clone, Default)]
pub struct MailConfig {
    /// HTTP endpoint of the transactional mail API. When absent, mails are only logged.
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub sender: String,
}

#[derive(Debug, Clone)]
pub struct WatermarkSettings {
    pub text: String,
    pub style: WatermarkStyle,
    pub min_dimension: u32,
    pub font_px: u32,
    /// Allow image sources on loopback and private networks
    pub allow_private_hosts: bool,
}

impl Default for WatermarkSettings {
    fn default() -> Self {
        Self {
            text: WATERMARK_TEXT.to_owned(),
            style: WatermarkStyle::Label,
            min_dimension: WATERMARK_MIN_DIMENSION,
            font_px: WATERMARK_FONT_PX,
            allow_private_hosts: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            mongodb_uri: DEFAULT_MONGODB_URI.to_owned(),
            mongodb_min_pool: MONGO_MIN_POOL_SIZE,
            mongodb_max_pool: MONGO_MAX_POOL_SIZE,
            jwt_secret: "change-this".to_owned(),
            mail: MailConfig {
                api_url: None,
                api_key: None,
                sender: SITE_CONTACT_EMAIL.to_owned(),
            },
            watermark: WatermarkSettings::default(),
            aws_region: AWS_REGION.to_owned(),
            aws_bucket: AWS_BUCKET.to_owned(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let jwt_secret = env_opt("JWT_SECRET")
            .or_else(|| env_opt("JWT_MOCK_SECRET"))
            .unwrap_or(defaults.jwt_secret);
        if jwt_secret == "change-this" {
            tracing::warn!("JWT_SECRET is not set, using the insecure default secret");
        }
        let mail = MailConfig {
            api_url: env_opt("MAIL_API_URL"),
            api_key: env_opt("MAIL_API_KEY"),
            sender: env_opt("MAIL_FROM").unwrap_or(defaults.mail.sender),
        };
        let watermark = WatermarkSettings {
            text: env_opt("WATERMARK_TEXT").unwrap_or(defaults.watermark.text),
            style: env_parse("WATERMARK_STYLE", defaults.watermark.style),
            min_dimension: env_parse("WATERMARK_MIN_DIMENSION", defaults.watermark.min_dimension),
            font_px: env_parse("WATERMARK_FONT_PX", defaults.watermark.font_px),
            allow_private_hosts: env_parse(
                "WATERMARK_ALLOW_PRIVATE_HOSTS",
                defaults.watermark.allow_private_hosts,
            ),
        };
        Self {
            port: env_parse("PORT", defaults.port),
            mongodb_uri: env_opt("MONGODB_URI").unwrap_or(defaults.mongodb_uri),
            mongodb_min_pool: env_parse("MONGODB_MIN_POOL_SIZE", defaults.mongodb_min_pool),
            mongodb_max_pool: env_parse("MONGODB_MAX_POOL_SIZE", defaults.mongodb_max_pool),
            jwt_secret,
            mail,
            watermark,
            aws_region: env_opt("AWS_REGION").unwrap_or(defaults.aws_region),
            aws_bucket: env_opt("AWS_BUCKET").unwrap_or(defaults.aws_bucket),
        }
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|val| !val.trim().is_empty())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env_opt(key)
        .and_then(|val| val.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_parse_falls_back_to_default() {
        std::env::set_var("LISTINGS_TEST_BAD_PORT", "not-a-number");
        let port: u16 = env_parse("LISTINGS_TEST_BAD_PORT", 3000);
        assert_eq!(port, 3000);
        std::env::set_var("LISTINGS_TEST_GOOD_PORT", " 8080 ");
        let port: u16 = env_parse("LISTINGS_TEST_GOOD_PORT", 3000);
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_env_opt_ignores_blank_values() {
        std::env::set_var("LISTINGS_TEST_BLANK", "   ");
        assert_eq!(env_opt("LISTINGS_TEST_BLANK"), None);
        assert_eq!(env_opt("LISTINGS_TEST_NEVER_SET"), None);
    }
}
