use crate::caption;
use crate::constants::{
    CAPTION_BOTTOM_MARGIN, FRAME_EXTRA_HEIGHT, FRAME_EXTRA_WIDTH, FRAME_SYMBOL_TOP,
    LOGO_SCALE_DIVISOR,
};
use crate::qrcode::QrCode;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageBuffer, Rgb, RgbImage, Rgba};

/*---- Utilities ----*/

/// Returns the symbol drawn with block characters, two columns per module, surrounded by
/// `border` light modules. Lines end with `\n`.
pub fn to_terminal_string(qr: &QrCode, border: i32) -> String {
    assert!(border >= 0, "Border must be non-negative");
    let mut result = String::new();
    for y in -border..qr.size() + border {
        for x in -border..qr.size() + border {
            let c: char = if qr.get_module(x, y) { '█' } else { ' ' };
            result.push(c);
            result.push(c);
        }
        result.push('\n');
    }
    result
}

/// Renders a symbol to an RGB image.
///
/// # Arguments
///
/// * `qr` - The symbol to draw.
/// * `module_size` - Pixels per module, at least 1.
/// * `border` - Quiet zone width in modules.
/// * `dark` - Color of dark modules.
/// * `light` - Color of light modules and the quiet zone.
///
/// The image is `(qr.size() + 2 * border) * module_size` pixels on each side.
///
/// # Example
///
/// ```
/// use image::Rgb;
/// use qrcompose::helper::render_symbol;
/// use qrcompose::qrcode::{QrCode, QrCodeEcc, QrSegment, Version};
///
/// let segs = [QrSegment::make_segment("Hello, World!")];
/// let qr = QrCode::encode_segments(&segs, QrCodeEcc::Low, Version::MIN, None).unwrap();
/// let img = render_symbol(&qr, 10, 4, Rgb([0, 0, 0]), Rgb([255, 255, 255]));
///
/// assert_eq!(img.dimensions(), (290, 290));
/// ```
pub fn render_symbol(qr: &QrCode, module_size: u32, border: u32, dark: Rgb<u8>, light: Rgb<u8>) -> RgbImage {
    assert!(module_size > 0, "Module size must be positive");
    let side = (qr.size() as u32 + 2 * border) * module_size;
    let border = border as i32;
    let mut img = ImageBuffer::new(side, side);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let qr_x = (x / module_size) as i32 - border;
        let qr_y = (y / module_size) as i32 - border;
        *pixel = if qr.get_module(qr_x, qr_y) { dark } else { light };
    }

    img
}

/// Pastes `logo` over the center of `img`.
///
/// The logo is resized to a square whose side is a fifth of the image's shorter side. When the
/// logo has an alpha channel it is used as the paste mask; otherwise the logo replaces the
/// pixels beneath it. Covering modules can make a low error correction symbol unreadable.
pub fn overlay_logo(img: &mut RgbImage, logo: &DynamicImage) {
    let (width, height) = img.dimensions();
    let side = width.min(height) / LOGO_SCALE_DIVISOR;
    if side == 0 {
        return;
    }
    let masked = logo.color().has_alpha();
    let resized = imageops::resize(&logo.to_rgba8(), side, side, FilterType::Lanczos3);
    let left = (width - side) / 2;
    let top = (height - side) / 2;

    for (x, y, pixel) in resized.enumerate_pixels() {
        let Rgba([r, g, b, a]) = *pixel;
        let alpha = if masked { a } else { u8::MAX };
        let under = img.get_pixel_mut(left + x, top + y);
        *under = blend(Rgb([r, g, b]), *under, alpha);
    }
}

/// Places `img` on a larger canvas with `text` centered near the bottom.
///
/// The canvas is 40 pixels wider and 80 pixels taller than `img` and filled with `background`.
/// The symbol sits 40 pixels from the top; the caption's ink ends 20 pixels above the bottom.
pub fn frame_with_caption(img: &RgbImage, text: &str, foreground: Rgb<u8>, background: Rgb<u8>) -> RgbImage {
    let frame_width = img.width() + FRAME_EXTRA_WIDTH;
    let frame_height = img.height() + FRAME_EXTRA_HEIGHT;
    let mut framed = RgbImage::from_pixel(frame_width, frame_height, background);

    let qr_x = (frame_width - img.width()) / 2;
    imageops::replace(&mut framed, img, i64::from(qr_x), i64::from(FRAME_SYMBOL_TOP));

    let bounds = caption::measure(text);
    let text_x = (i64::from(frame_width) - bounds.width()) / 2;
    let text_y = i64::from(frame_height) - bounds.height() - i64::from(CAPTION_BOTTOM_MARGIN);
    caption::draw(&mut framed, text, text_x - bounds.left, text_y - bounds.top, foreground);

    framed
}

fn blend(top: Rgb<u8>, bottom: Rgb<u8>, alpha: u8) -> Rgb<u8> {
    let a = u16::from(alpha);
    Rgb(std::array::from_fn(|i| {
        ((u16::from(top.0[i]) * a + u16::from(bottom.0[i]) * (255 - a) + 127) / 255) as u8
    }))
}
