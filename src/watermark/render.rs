use image::{Pixel, Rgba, RgbaImage};

use super::{font::BitmapText, WatermarkConfig, WatermarkStyle};

const FILL: Rgba<u8> = Rgba([255, 255, 255, 230]);
const OUTLINE: Rgba<u8> = Rgba([0, 0, 0, 90]);
const PILL_START: [u8; 3] = [15, 23, 42];
const PILL_END: [u8; 3] = [30, 64, 175];
const PILL_ALPHA: u8 = 140;
const TILE_FILL: Rgba<u8> = Rgba([255, 255, 255, 46]);

/// Pixel rectangle touched by a mark, used to keep drawing inside bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkBounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl MarkBounds {
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }
}

/// Composite the configured mark onto the image in place.
/// Returns the area that may have been changed.
pub fn render(img: &mut RgbaImage, config: &WatermarkConfig) -> MarkBounds {
    match config.style {
        WatermarkStyle::Label => render_label(img, config),
        WatermarkStyle::Pill => render_pill(img, config),
        WatermarkStyle::Tiled => render_tiled(img, config),
    }
}

/// Text in the bottom-right corner with a thin dark outline
fn render_label(img: &mut RgbaImage, config: &WatermarkConfig) -> MarkBounds {
    let text = BitmapText::new(config.font_px);
    let (w, h) = img.dimensions();
    let text_w = text.width(&config.text);
    let text_h = text.height();
    let margin = config.margin;
    let x = w.saturating_sub(text_w + margin);
    let y = h.saturating_sub(text_h + margin);
    text.draw_outlined(img, &config.text, x as i64, y as i64, FILL, OUTLINE);
    // the outline reaches one pixel beyond the glyphs
    let x0 = x.saturating_sub(1);
    let y0 = y.saturating_sub(1);
    MarkBounds {
        x: x0,
        y: y0,
        width: (text_w + 2).min(w - x0),
        height: (text_h + 2).min(h - y0),
    }
}

/// Text on a rounded badge filled with a horizontal gradient
fn render_pill(img: &mut RgbaImage, config: &WatermarkConfig) -> MarkBounds {
    let text = BitmapText::new(config.font_px);
    let (w, h) = img.dimensions();
    let pad_x = text.height() / 2 + 2;
    let pad_y = text.height() / 3 + 1;
    let pill_w = (text.width(&config.text) + pad_x * 2).min(w);
    let pill_h = (text.height() + pad_y * 2).min(h);
    let x = w.saturating_sub(pill_w + config.margin);
    let y = h.saturating_sub(pill_h + config.margin);
    let bounds = MarkBounds {
        x,
        y,
        width: pill_w,
        height: pill_h,
    };
    fill_rounded_gradient(img, bounds);
    text.draw(
        img,
        &config.text,
        (x + pad_x) as i64,
        (y + pad_y) as i64,
        FILL,
    );
    bounds
}

/// Faint text repeated over the whole image in staggered rows, giving a
/// diagonal pattern
fn render_tiled(img: &mut RgbaImage, config: &WatermarkConfig) -> MarkBounds {
    let text = BitmapText::new(config.font_px * 2);
    let (w, h) = img.dimensions();
    let cell_w = (text.width(&config.text) + text.height() * 3) as i64;
    let cell_h = (text.height() * 4) as i64;
    let shift = (text.height() * 2) as i64;
    let mut row = 0i64;
    let mut y = -cell_h / 2;
    while y < h as i64 {
        let mut x = -((row * shift) % cell_w);
        while x < w as i64 {
            text.draw(img, &config.text, x, y, TILE_FILL);
            x += cell_w;
        }
        y += cell_h;
        row += 1;
    }
    MarkBounds {
        x: 0,
        y: 0,
        width: w,
        height: h,
    }
}

fn fill_rounded_gradient(img: &mut RgbaImage, bounds: MarkBounds) {
    let radius = bounds.height as f32 / 2.0;
    let span = bounds.width.saturating_sub(1).max(1) as f32;
    for dy in 0..bounds.height {
        for dx in 0..bounds.width {
            if !inside_rounded(dx, dy, bounds.width, bounds.height, radius) {
                continue;
            }
            let t = dx as f32 / span;
            let color = Rgba([
                lerp(PILL_START[0], PILL_END[0], t),
                lerp(PILL_START[1], PILL_END[1], t),
                lerp(PILL_START[2], PILL_END[2], t),
                PILL_ALPHA,
            ]);
            img.get_pixel_mut(bounds.x + dx, bounds.y + dy).blend(&color);
        }
    }
}

fn inside_rounded(dx: u32, dy: u32, w: u32, h: u32, radius: f32) -> bool {
    let (px, py) = (dx as f32 + 0.5, dy as f32 + 0.5);
    let cx = px.clamp(radius, (w as f32 - radius).max(radius));
    let cy = py.clamp(radius, (h as f32 - radius).max(radius));
    let (ddx, ddy) = (px - cx, py - cy);
    ddx * ddx + ddy * ddy <= radius * radius
}

fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(style: WatermarkStyle) -> WatermarkConfig {
        WatermarkConfig {
            style,
            ..WatermarkConfig::default()
        }
    }

    fn gray(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([90, 90, 90, 255]))
    }

    #[test]
    fn test_label_only_touches_its_bounds() {
        let original = gray(400, 300);
        let mut img = original.clone();
        let bounds = render(&mut img, &config(WatermarkStyle::Label));
        assert!(bounds.x + bounds.width <= 400);
        assert!(bounds.y + bounds.height <= 300);
        assert!(bounds.x > 200 && bounds.y > 250);
        let mut changed = 0;
        for (x, y, px) in img.enumerate_pixels() {
            if px != original.get_pixel(x, y) {
                assert!(bounds.contains(x, y), "pixel ({x}, {y}) outside mark");
                changed += 1;
            }
        }
        assert!(changed > 0);
    }

    #[test]
    fn test_pill_draws_badge_in_corner() {
        let original = gray(400, 300);
        let mut img = original.clone();
        let bounds = render(&mut img, &config(WatermarkStyle::Pill));
        // badge centre is tinted by the gradient
        let cx = bounds.x + bounds.width / 2;
        let cy = bounds.y + 1;
        assert_ne!(img.get_pixel(cx, cy), original.get_pixel(cx, cy));
        // rounded corner stays untouched
        assert_eq!(img.get_pixel(bounds.x, bounds.y), original.get_pixel(bounds.x, bounds.y));
        assert_eq!(img.get_pixel(10, 10), original.get_pixel(10, 10));
    }

    #[test]
    fn test_tiled_covers_whole_image() {
        let original = gray(600, 600);
        let mut img = original.clone();
        render(&mut img, &config(WatermarkStyle::Tiled));
        let quadrant_changed = |x0: u32, y0: u32| {
            (x0..x0 + 300)
                .flat_map(|x| (y0..y0 + 300).map(move |y| (x, y)))
                .any(|(x, y)| img.get_pixel(x, y) != original.get_pixel(x, y))
        };
        assert!(quadrant_changed(0, 0));
        assert!(quadrant_changed(300, 0));
        assert!(quadrant_changed(0, 300));
        assert!(quadrant_changed(300, 300));
    }

    #[test]
    fn test_label_on_narrow_image_does_not_panic() {
        let mut img = gray(30, 20);
        let bounds = render(&mut img, &config(WatermarkStyle::Label));
        assert_eq!(bounds.x, 0);
        let mut img = gray(30, 20);
        render(&mut img, &config(WatermarkStyle::Pill));
    }
}
