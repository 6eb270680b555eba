use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use super::{WatermarkConfig, WatermarkStyle};

const OVERLAY_FONT: &str = "Inter, system-ui, -apple-system, Segoe UI, Roboto, Helvetica, Arial, sans-serif";

/// Non-destructive overlay to render on top of an image whose pixels could
/// not be watermarked. The page positions `container` absolutely over the
/// image's host element and puts `label` (when present) inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverlaySpec {
    pub style: WatermarkStyle,
    pub text: String,
    pub attributes: BTreeMap<String, String>,
    /// Style the host element needs so the overlay can be positioned
    pub host: BTreeMap<String, String>,
    pub container: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<BTreeMap<String, String>>,
}

impl OverlaySpec {
    pub fn new(config: &WatermarkConfig) -> Self {
        let attributes = css(&[("data-wm-overlay", "1"), ("aria-hidden", "true")]);
        let host = css(&[("position", "relative")]);
        let mut container = css(&[
            ("position", "absolute"),
            ("inset", "0"),
            ("pointer-events", "none"),
            ("z-index", "60"),
            ("display", "block"),
        ]);
        let label = match config.style {
            WatermarkStyle::Label => Some(label_css(config)),
            WatermarkStyle::Pill => {
                let mut label = label_css(config);
                label.insert(
                    "background".into(),
                    "linear-gradient(90deg, rgba(15,23,42,0.55), rgba(30,64,175,0.55))".into(),
                );
                label.insert("padding".into(), "2px 8px".into());
                label.insert("border-radius".into(), "999px".into());
                Some(label)
            }
            WatermarkStyle::Tiled => {
                container.insert(
                    "background-image".into(),
                    format!("url(\"{}\")", tile_data_url(&config.text, config.font_px * 2)),
                );
                container.insert("background-repeat".into(), "repeat".into());
                None
            }
        };
        Self {
            style: config.style,
            text: config.text.clone(),
            attributes,
            host,
            container,
            label,
        }
    }

    /// Markup for the overlay element, ready to append to the host
    pub fn to_html(&self) -> String {
        let attrs = self
            .attributes
            .iter()
            .map(|(k, v)| format!(" {}=\"{}\"", k, escape_html(v)))
            .collect::<String>();
        let label = match &self.label {
            Some(label) => format!(
                "<div style=\"{}\">{}</div>",
                escape_html(&inline_style(label)),
                escape_html(&self.text)
            ),
            None => String::new(),
        };
        format!(
            "<div{} style=\"{}\">{}</div>",
            attrs,
            escape_html(&inline_style(&self.container)),
            label
        )
    }
}

fn label_css(config: &WatermarkConfig) -> BTreeMap<String, String> {
    let font = format!("800 {}px {}", config.font_px, OVERLAY_FONT);
    let right = format!("{}px", config.margin);
    let bottom = format!("{}px", config.margin.saturating_sub(2));
    css(&[
        ("position", "absolute"),
        ("right", &right),
        ("bottom", &bottom),
        ("font", &font),
        ("color", "rgba(255,255,255,0.95)"),
        ("text-shadow", "0 1px 2px rgba(0,0,0,0.6)"),
        ("user-select", "none"),
        ("pointer-events", "none"),
        ("white-space", "nowrap"),
    ])
}

fn css(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn inline_style(props: &BTreeMap<String, String>) -> String {
    props
        .iter()
        .map(|(k, v)| format!("{k}:{v}"))
        .collect::<Vec<_>>()
        .join(";")
}

/// SVG tile with the text rotated across it, as a data URL
fn tile_data_url(text: &str, font_px: u32) -> String {
    let size = font_px * 12;
    let center = size / 2;
    let svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{size}' height='{size}'>\
         <text x='{center}' y='{center}' fill='rgba(255,255,255,0.18)' font-family='sans-serif' \
         font-weight='800' font-size='{font_px}' text-anchor='middle' \
         transform='rotate(-30 {center} {center})'>{}</text></svg>",
        escape_html(text)
    );
    format!("data:image/svg+xml,{}", encode_svg(&svg))
}

fn encode_svg(svg: &str) -> String {
    let mut out = String::with_capacity(svg.len());
    for ch in svg.chars() {
        match ch {
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            '#' => out.push_str("%23"),
            '%' => out.push_str("%25"),
            '"' => out.push_str("%22"),
            '\n' => out.push_str("%0A"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
