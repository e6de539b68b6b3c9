//! Caption text measured and drawn with a fixed 8x8 bitmap font.
//!
//! Glyphs come from `font8x8`; characters it has no glyph for are drawn as `?`. Each glyph
//! advances the pen by 8 pixels. Measurements use the ink (lit pixels) rather than the
//! advance box, so centering is optical.

use font8x8::{
    UnicodeFonts, BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, GREEK_FONTS, HIRAGANA_FONTS, LATIN_FONTS,
    MISC_FONTS,
};
use image::{Rgb, RgbImage};

/// Horizontal pen advance per character.
pub const GLYPH_ADVANCE: i64 = 8;

/// Ink bounding box of a caption, relative to its drawing origin.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TextBounds {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl TextBounds {
    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }
}

/// Measures the ink bounding box of `text`. Text without ink measures as empty.
pub fn measure(text: &str) -> TextBounds {
    let mut bounds: Option<TextBounds> = None;
    for (x, y) in ink(text) {
        let b = bounds.get_or_insert(TextBounds {
            left: x,
            top: y,
            right: x + 1,
            bottom: y + 1,
        });
        b.left = b.left.min(x);
        b.top = b.top.min(y);
        b.right = b.right.max(x + 1);
        b.bottom = b.bottom.max(y + 1);
    }
    bounds.unwrap_or_default()
}

/// Draws `text` with its drawing origin at (`x`, `y`). Pixels off the canvas are clipped.
pub fn draw(canvas: &mut RgbImage, text: &str, x: i64, y: i64, color: Rgb<u8>) {
    let (width, height) = canvas.dimensions();
    for (dx, dy) in ink(text) {
        let (px, py) = (x + dx, y + dy);
        if (0..i64::from(width)).contains(&px) && (0..i64::from(height)).contains(&py) {
            canvas.put_pixel(px as u32, py as u32, color);
        }
    }
}

/// Yields the coordinates of every lit pixel of `text`, relative to its origin.
fn ink(text: &str) -> impl Iterator<Item = (i64, i64)> + '_ {
    text.chars().enumerate().flat_map(|(index, c)| {
        let rows = glyph(c);
        let pen = index as i64 * GLYPH_ADVANCE;
        (0..8i64).flat_map(move |row| {
            let bits = rows[row as usize];
            // Bit 0 is the leftmost pixel
            (0..8i64)
                .filter(move |col| bits & (1 << col) != 0)
                .map(move |col| (pen + col, row))
        })
    })
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| GREEK_FONTS.get(c))
        .or_else(|| BOX_FONTS.get(c))
        .or_else(|| BLOCK_FONTS.get(c))
        .or_else(|| HIRAGANA_FONTS.get(c))
        .or_else(|| MISC_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}
