//! Listing photo watermarking.
//!
//! The mark is baked into the pixels whenever the source bytes can be read,
//! so a saved copy of the image keeps it. When the bytes are unavailable the
//! caller gets an [`OverlaySpec`] describing an on-screen overlay instead.
//! Small images (icons, logos) and opted-out images are left alone.

use image::{DynamicImage, ImageOutputFormat};
use serde::{Deserialize, Serialize};
use std::{fmt, io::Cursor, net::IpAddr, str::FromStr, time::Duration};
use thiserror::Error;
use utoipa::ToSchema;

use crate::{config::WatermarkSettings, constants::*};

pub mod font;
pub mod overlay;
pub mod render;
pub mod tracker;

pub use overlay::OverlaySpec;
pub use tracker::{ImageStatus, ImageTracker, ObserveResult, ObservedImage};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkStyle {
    /// plain text in the bottom-right corner
    #[default]
    Label,
    /// text on a rounded gradient badge
    Pill,
    /// faint text repeated across the whole image
    Tiled,
}

impl FromStr for WatermarkStyle {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "label" | "text" => Ok(Self::Label),
            "pill" | "badge" => Ok(Self::Pill),
            "tiled" | "pattern" => Ok(Self::Tiled),
            other => Err(WatermarkError::UnknownStyle(other.to_owned())),
        }
    }
}

impl fmt::Display for WatermarkStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label => write!(f, "label"),
            Self::Pill => write!(f, "pill"),
            Self::Tiled => write!(f, "tiled"),
        }
    }
}

#[derive(Debug, Error)]
pub enum WatermarkError {
    #[error("unknown watermark style: {0}")]
    UnknownStyle(String),
    #[error("unsupported image source: {0}")]
    UnsupportedSource(String),
    #[error("unable to fetch image: {0}")]
    Fetch(String),
    #[error("unable to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image is too small: {width}x{height}")]
    TooSmall { width: u32, height: u32 },
    #[error("unable to encode image: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkConfig {
    pub text: String,
    pub style: WatermarkStyle,
    pub min_dimension: u32,
    pub font_px: u32,
    pub margin: u32,
    pub allow_private_hosts: bool,
    /// Largest source image that will be read
    pub max_source_bytes: usize,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            text: WATERMARK_TEXT.to_owned(),
            style: WatermarkStyle::Label,
            min_dimension: WATERMARK_MIN_DIMENSION,
            font_px: WATERMARK_FONT_PX,
            margin: WATERMARK_MARGIN_PX,
            allow_private_hosts: false,
            max_source_bytes: WATERMARK_MAX_SOURCE_BYTES,
        }
    }
}

impl From<&WatermarkSettings> for WatermarkConfig {
    fn from(settings: &WatermarkSettings) -> Self {
        Self {
            text: settings.text.clone(),
            style: settings.style,
            min_dimension: settings.min_dimension,
            font_px: settings.font_px,
            allow_private_hosts: settings.allow_private_hosts,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    OptedOut,
    TooSmall,
    UnknownSize,
}

/// Result of watermarking one image
#[derive(Debug, Clone, PartialEq)]
pub enum WatermarkOutcome {
    /// PNG bytes with the mark composited in
    Baked(Vec<u8>),
    Overlay(OverlaySpec),
    Skipped(SkipReason),
}

#[derive(Debug, Clone)]
pub struct Watermarker {
    config: WatermarkConfig,
}

impl Watermarker {
    pub fn new(config: WatermarkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WatermarkConfig {
        &self.config
    }

    /// Same engine with another rendering style
    pub fn with_style(&self, style: WatermarkStyle) -> Self {
        let mut config = self.config.clone();
        config.style = style;
        Self { config }
    }

    pub fn is_too_small(&self, width: u32, height: u32) -> bool {
        width < self.config.min_dimension || height < self.config.min_dimension
    }

    /// Whether an image should be left alone. Images of unknown size are
    /// only checked once their pixels have been decoded.
    pub fn skip_reason(&self, opt_out: bool, size: Option<(u32, u32)>) -> Option<SkipReason> {
        if opt_out {
            return Some(SkipReason::OptedOut);
        }
        match size {
            Some((w, h)) if self.is_too_small(w, h) => Some(SkipReason::TooSmall),
            _ => None,
        }
    }

    /// Decode the image, composite the mark and encode the result as PNG
    pub fn bake(&self, bytes: &[u8]) -> Result<Vec<u8>, WatermarkError> {
        let img = image::load_from_memory(bytes)?;
        let (width, height) = (img.width(), img.height());
        if self.is_too_small(width, height) {
            return Err(WatermarkError::TooSmall { width, height });
        }
        let mut rgba = img.to_rgba8();
        render::render(&mut rgba, &self.config);
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(rgba)
            .write_to(&mut out, ImageOutputFormat::Png)
            .map_err(|err| WatermarkError::Encode(err.to_string()))?;
        Ok(out.into_inner())
    }

    pub fn overlay(&self) -> OverlaySpec {
        OverlaySpec::new(&self.config)
    }

    /// Watermark one image.
    ///
    /// `size` is the size the page reported for the image, `source` the
    /// fetched bytes or the reason they could not be read. Opted-out and
    /// small images are skipped before anything else happens; a failed read
    /// or decode falls back to an overlay only when the image is known to be
    /// large enough.
    pub fn process(
        &self,
        opt_out: bool,
        size: Option<(u32, u32)>,
        source: Result<&[u8], WatermarkError>,
    ) -> WatermarkOutcome {
        if let Some(reason) = self.skip_reason(opt_out, size) {
            return WatermarkOutcome::Skipped(reason);
        }
        let err = match source {
            Ok(bytes) => match self.bake(bytes) {
                Ok(png) => return WatermarkOutcome::Baked(png),
                Err(WatermarkError::TooSmall { .. }) => {
                    return WatermarkOutcome::Skipped(SkipReason::TooSmall)
                }
                Err(err) => err,
            },
            Err(err) => err,
        };
        tracing::debug!("watermark baking failed, falling back to overlay: {err}");
        match size {
            Some(_) => WatermarkOutcome::Overlay(self.overlay()),
            None => WatermarkOutcome::Skipped(SkipReason::UnknownSize),
        }
    }
}

/// Run [`Watermarker::process`] on the blocking pool, decoding and
/// encoding are too heavy for the async workers
pub async fn process_blocking(
    watermarker: Watermarker,
    opt_out: bool,
    size: Option<(u32, u32)>,
    fetched: Result<Vec<u8>, WatermarkError>,
) -> Result<WatermarkOutcome, tokio::task::JoinError> {
    tokio::task::spawn_blocking(move || match fetched {
        Ok(bytes) => watermarker.process(opt_out, size, Ok(&bytes)),
        Err(err) => watermarker.process(opt_out, size, Err(err)),
    })
    .await
}

impl Default for Watermarker {
    fn default() -> Self {
        Self::new(WatermarkConfig::default())
    }
}

/// HTTP client used to read remote image sources
pub fn fetch_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(WATERMARK_FETCH_TIMEOUT_SECS))
        .build()
}

/// Read the bytes of a remote image.
///
/// Only http(s) sources are allowed, hosts on loopback or private networks
/// are refused unless the config allows them, and bodies larger than
/// `max_source_bytes` are rejected without being buffered.
pub async fn fetch_source(
    client: &reqwest::Client,
    src: &str,
    config: &WatermarkConfig,
) -> Result<Vec<u8>, WatermarkError> {
    let url = reqwest::Url::parse(src)
        .map_err(|_| WatermarkError::UnsupportedSource(src.to_owned()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(WatermarkError::UnsupportedSource(src.to_owned()));
    }
    if !config.allow_private_hosts {
        ensure_public_host(&url).await?;
    }
    let mut res = client
        .get(url)
        .send()
        .await
        .map_err(|err| WatermarkError::Fetch(err.to_string()))?;
    if !res.status().is_success() {
        return Err(WatermarkError::Fetch(format!("status {}", res.status())));
    }
    let limit = config.max_source_bytes;
    let too_large = || WatermarkError::Fetch(format!("image is larger than {limit} bytes"));
    if res.content_length().map_or(false, |len| len > limit as u64) {
        return Err(too_large());
    }
    let mut bytes = Vec::new();
    while let Some(chunk) = res
        .chunk()
        .await
        .map_err(|err| WatermarkError::Fetch(err.to_string()))?
    {
        if bytes.len() + chunk.len() > limit {
            return Err(too_large());
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Refuse urls whose host is, or resolves to, a non public address
async fn ensure_public_host(url: &reqwest::Url) -> Result<(), WatermarkError> {
    let refused = || WatermarkError::UnsupportedSource(url.to_string());
    let host = url.host_str().ok_or_else(refused)?;
    let literal = host.trim_start_matches('[').trim_end_matches(']');
    let addrs = match literal.parse::<IpAddr>() {
        Ok(ip) => vec![ip],
        Err(_) => {
            let port = url.port_or_known_default().unwrap_or(80);
            tokio::net::lookup_host((host, port))
                .await
                .map_err(|err| WatermarkError::Fetch(err.to_string()))?
                .map(|addr| addr.ip())
                .collect()
        }
    };
    if addrs.is_empty() || !addrs.iter().all(is_public_ip) {
        return Err(refused());
    }
    Ok(())
}

fn is_public_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ip) => {
            let [a, b, ..] = ip.octets();
            // 100.64.0.0/10 is carrier grade NAT
            let shared = a == 100 && (b & 0xc0) == 64;
            !(ip.is_private()
                || ip.is_loopback()
                || ip.is_link_local()
                || ip.is_unspecified()
                || ip.is_broadcast()
                || ip.is_documentation()
                || shared)
        }
        IpAddr::V6(ip) => {
            if let Some(v4) = ip.to_ipv4_mapped() {
                return is_public_ip(&IpAddr::V4(v4));
            }
            let first = ip.segments()[0];
            let unique_local = (first & 0xfe00) == 0xfc00;
            let link_local = (first & 0xffc0) == 0xfe80;
            !(ip.is_loopback() || ip.is_unspecified() || unique_local || link_local)
        }
    }
}

#[cfg(test)]
pub(crate) fn test_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([70, 110, 150, 255]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageOutputFormat::Png)
        .unwrap();
    out.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_from_str() {
        assert_eq!("Pill".parse::<WatermarkStyle>().unwrap(), WatermarkStyle::Pill);
        assert_eq!("pattern".parse::<WatermarkStyle>().unwrap(), WatermarkStyle::Tiled);
        assert_eq!(" label ".parse::<WatermarkStyle>().unwrap(), WatermarkStyle::Label);
        assert!("stripes".parse::<WatermarkStyle>().is_err());
    }

    #[test]
    fn test_bake_changes_pixels_and_keeps_size() {
        let wm = Watermarker::default();
        let src = test_png(300, 200);
        let png = wm.bake(&src).unwrap();
        let baked = image::load_from_memory(&png).unwrap().to_rgba8();
        let original = image::load_from_memory(&src).unwrap().to_rgba8();
        assert_eq!(baked.dimensions(), (300, 200));
        assert_ne!(baked, original);
    }

    #[test]
    fn test_small_image_is_never_marked() {
        let wm = Watermarker::default();
        let src = test_png(100, 300);
        let outcome = wm.process(false, Some((100, 300)), Ok(&src));
        assert_eq!(outcome, WatermarkOutcome::Skipped(SkipReason::TooSmall));
        // reported size missing, decoded size is checked instead
        let outcome = wm.process(false, None, Ok(&src));
        assert_eq!(outcome, WatermarkOutcome::Skipped(SkipReason::TooSmall));
        // unreadable small image gets no overlay either
        let err = WatermarkError::Fetch("blocked".into());
        let outcome = wm.process(false, Some((64, 64)), Err(err));
        assert_eq!(outcome, WatermarkOutcome::Skipped(SkipReason::TooSmall));
    }

    #[test]
    fn test_opted_out_image_is_never_marked() {
        let wm = Watermarker::default();
        let src = test_png(800, 600);
        let outcome = wm.process(true, Some((800, 600)), Ok(&src));
        assert_eq!(outcome, WatermarkOutcome::Skipped(SkipReason::OptedOut));
        let err = WatermarkError::Fetch("blocked".into());
        let outcome = wm.process(true, Some((800, 600)), Err(err));
        assert_eq!(outcome, WatermarkOutcome::Skipped(SkipReason::OptedOut));
    }

    #[test]
    fn test_unreadable_image_falls_back_to_overlay() {
        let wm = Watermarker::default().with_style(WatermarkStyle::Pill);
        let err = WatermarkError::Fetch("status 403".into());
        match wm.process(false, Some((800, 600)), Err(err)) {
            WatermarkOutcome::Overlay(spec) => assert_eq!(spec.style, WatermarkStyle::Pill),
            other => panic!("expected overlay, got {other:?}"),
        }
        match wm.process(false, Some((800, 600)), Ok(b"not an image")) {
            WatermarkOutcome::Overlay(_) => {}
            other => panic!("expected overlay, got {other:?}"),
        }
        let err = WatermarkError::Fetch("status 403".into());
        let outcome = wm.process(false, None, Err(err));
        assert_eq!(outcome, WatermarkOutcome::Skipped(SkipReason::UnknownSize));
    }

    fn local_sources() -> WatermarkConfig {
        WatermarkConfig {
            allow_private_hosts: true,
            ..WatermarkConfig::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_source_rejects_non_http() {
        let client = fetch_client().unwrap();
        let config = WatermarkConfig::default();
        let err = fetch_source(&client, "file:///etc/passwd", &config).await.unwrap_err();
        assert!(matches!(err, WatermarkError::UnsupportedSource(_)));
        let err = fetch_source(&client, "not a url", &config).await.unwrap_err();
        assert!(matches!(err, WatermarkError::UnsupportedSource(_)));
    }

    #[tokio::test]
    async fn test_fetch_source_refuses_private_hosts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/photo.png")
            .with_body(test_png(200, 200))
            .expect(0)
            .create_async()
            .await;
        let client = fetch_client().unwrap();
        let config = WatermarkConfig::default();
        let local = format!("{}/photo.png", server.url());
        let sources = [
            local.as_str(),
            "http://169.254.169.254/latest/meta-data",
            "http://10.0.0.7/a.png",
            "http://192.168.1.20/a.png",
            "http://[::1]/a.png",
            "http://[fd00::1]/a.png",
            "http://[::ffff:127.0.0.1]/a.png",
            "http://0.0.0.0/a.png",
        ];
        for src in sources {
            let err = fetch_source(&client, src, &config).await.unwrap_err();
            assert!(matches!(err, WatermarkError::UnsupportedSource(_)), "{src}");
        }
        mock.assert_async().await;
    }

    #[test]
    fn test_public_ip_check() {
        assert!(is_public_ip(&"93.184.216.34".parse().unwrap()));
        assert!(is_public_ip(&"2606:2800:220:1::248".parse().unwrap()));
        assert!(!is_public_ip(&"100.72.1.1".parse().unwrap()));
        assert!(!is_public_ip(&"172.16.4.4".parse().unwrap()));
        assert!(!is_public_ip(&"fe80::1".parse().unwrap()));
    }

    #[tokio::test]
    async fn test_fetch_source_reports_http_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/photo.png")
            .with_status(404)
            .create_async()
            .await;
        let client = fetch_client().unwrap();
        let url = format!("{}/photo.png", server.url());
        let err = fetch_source(&client, &url, &local_sources()).await.unwrap_err();
        assert!(matches!(err, WatermarkError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_fetch_source_caps_body_size() {
        let mut server = mockito::Server::new_async().await;
        let _big = server
            .mock("GET", "/big.png")
            .with_body(vec![7u8; 64 * 1024])
            .create_async()
            .await;
        let _small = server
            .mock("GET", "/small.png")
            .with_body(vec![7u8; 512])
            .create_async()
            .await;
        let client = fetch_client().unwrap();
        let config = WatermarkConfig {
            max_source_bytes: 1024,
            ..local_sources()
        };
        let url = format!("{}/big.png", server.url());
        let err = fetch_source(&client, &url, &config).await.unwrap_err();
        assert!(matches!(err, WatermarkError::Fetch(msg) if msg.contains("larger than 1024")));
        let url = format!("{}/small.png", server.url());
        let bytes = fetch_source(&client, &url, &config).await.unwrap();
        assert_eq!(bytes.len(), 512);
    }
}
