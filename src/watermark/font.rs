use image::{Pixel, Rgba, RgbaImage};

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;

/// 5x7 bitmap glyphs, one byte per row, bit 4 is the leftmost column
fn glyph(ch: char) -> [u8; 7] {
    match ch.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        ' ' => [0x00; 7],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        '/' => [0x01, 0x02, 0x02, 0x04, 0x08, 0x08, 0x10],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '@' => [0x0E, 0x11, 0x17, 0x15, 0x17, 0x10, 0x0E],
        '&' => [0x0C, 0x12, 0x14, 0x08, 0x15, 0x12, 0x0D],
        _ => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
    }
}

/// Text rendered with the embedded bitmap font at a given cap height
#[derive(Debug, Clone, Copy)]
pub struct BitmapText {
    glyph_w: u32,
    glyph_h: u32,
    spacing: u32,
}

impl BitmapText {
    pub fn new(font_px: u32) -> Self {
        let glyph_h = font_px.max(GLYPH_H);
        let glyph_w = ((glyph_h * GLYPH_W) as f32 / GLYPH_H as f32).round() as u32;
        let spacing = (glyph_h / GLYPH_H).max(1);
        Self {
            glyph_w,
            glyph_h,
            spacing,
        }
    }

    pub fn height(&self) -> u32 {
        self.glyph_h
    }

    /// Width in pixels of `text`, without trailing spacing
    pub fn width(&self, text: &str) -> u32 {
        let count = text.chars().count() as u32;
        if count == 0 {
            return 0;
        }
        count * self.glyph_w + (count - 1) * self.spacing
    }

    /// Draw `text` with its top-left corner at (x, y). Pixels falling outside
    /// the image are clipped.
    pub fn draw(&self, img: &mut RgbaImage, text: &str, x: i64, y: i64, color: Rgba<u8>) {
        let mut pen_x = x;
        for ch in text.chars() {
            self.draw_glyph(img, ch, pen_x, y, color);
            pen_x += (self.glyph_w + self.spacing) as i64;
        }
    }

    /// Draw `text` with a one pixel outline around every stroke
    pub fn draw_outlined(
        &self,
        img: &mut RgbaImage,
        text: &str,
        x: i64,
        y: i64,
        fill: Rgba<u8>,
        outline: Rgba<u8>,
    ) {
        for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            self.draw(img, text, x + dx, y + dy, outline);
        }
        self.draw(img, text, x, y, fill);
    }

    fn draw_glyph(&self, img: &mut RgbaImage, ch: char, x: i64, y: i64, color: Rgba<u8>) {
        let rows = glyph(ch);
        let (img_w, img_h) = (img.width() as i64, img.height() as i64);
        for dy in 0..self.glyph_h {
            let row = rows[(dy * GLYPH_H / self.glyph_h) as usize];
            if row == 0 {
                continue;
            }
            for dx in 0..self.glyph_w {
                let col = dx * GLYPH_W / self.glyph_w;
                if row & (0x10 >> col) == 0 {
                    continue;
                }
                let (px, py) = (x + dx as i64, y + dy as i64);
                if px < 0 || py < 0 || px >= img_w || py >= img_h {
                    continue;
                }
                img.get_pixel_mut(px as u32, py as u32).blend(&color);
            }
        }
    }
}
