//! Defaults and layout constants shared by the pipeline and its front ends.

// =============================================================================
// Request Defaults
// =============================================================================

/// Destination used when no filename is given.
pub const DEFAULT_FILENAME: &str = "qr_code.png";

/// Pixels per module.
pub const DEFAULT_MODULE_SIZE: u32 = 10;

/// Quiet zone width in modules.
pub const DEFAULT_BORDER: u32 = 4;

pub const DEFAULT_FILL_COLOR: &str = "black";

pub const DEFAULT_BACK_COLOR: &str = "white";

/// Starting symbol version; the encoder grows it when the payload needs more room.
pub const DEFAULT_VERSION: u32 = 1;

pub const DEFAULT_ERROR_CORRECTION: &str = "L";

pub const DEFAULT_FORMAT: &str = "PNG";

/// Largest accepted module size in pixels.
pub const MAX_MODULE_SIZE: u32 = 100;

/// Largest accepted quiet zone in modules.
pub const MAX_BORDER: u32 = 100;

/// Largest final image, frame included, in pixels (64 megapixels, 192 MiB of RGB).
pub const MAX_IMAGE_PIXELS: u64 = 64 * 1024 * 1024;

// =============================================================================
// Decoration Layout
// =============================================================================

/// The logo side is the symbol image's shorter side divided by this.
pub const LOGO_SCALE_DIVISOR: u32 = 5;

/// Extra canvas width added by the caption frame.
pub const FRAME_EXTRA_WIDTH: u32 = 40;

/// Extra canvas height added by the caption frame.
pub const FRAME_EXTRA_HEIGHT: u32 = 80;

/// Distance from the canvas top to the pasted symbol.
pub const FRAME_SYMBOL_TOP: u32 = 40;

/// Distance from the caption's bottom edge to the canvas bottom.
pub const CAPTION_BOTTOM_MARGIN: u32 = 20;
