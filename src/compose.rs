//! The encode, rasterize, decorate and persist pipeline.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::RgbImage;
use tracing::{debug, info};

use crate::constants::{FRAME_EXTRA_HEIGHT, FRAME_EXTRA_WIDTH, MAX_IMAGE_PIXELS};
use crate::error::{ComposeError, PersistError};
use crate::helper;
use crate::qrcode::{QrCode, QrCodeEcc, QrSegment, Version};
use crate::request::{GenerationRequest, OutputFormat};

/// Composes the image described by `request` and writes it to its destination.
///
/// The destination file is only created once the image has been fully encoded, so a failed
/// composition leaves nothing behind.
///
/// # Example
///
/// ```no_run
/// use qrcompose::{compose, ComposeOptions};
///
/// let request = ComposeOptions {
///     frame_text: Some("Scan me".into()),
///     ..ComposeOptions::new("https://example.com")
/// }
/// .resolve()?;
/// compose(&request)?;
/// # Ok::<(), qrcompose::ComposeError>(())
/// ```
pub fn compose(request: &GenerationRequest) -> Result<(), ComposeError> {
    let image = render(request)?;
    persist(&image, request.format(), request.destination())?;
    info!(
        path = %request.destination().display(),
        format = %request.format(),
        width = image.width(),
        height = image.height(),
        "QR code written"
    );
    Ok(())
}

/// Runs the pipeline without writing anything, returning the final image.
///
/// # Errors
///
/// Besides the encoding and logo failures, a request whose final image would exceed
/// [`MAX_IMAGE_PIXELS`] fails with [`ComposeError::InvalidParameter`] before any pixel is
/// allocated.
pub fn render(request: &GenerationRequest) -> Result<RgbImage, ComposeError> {
    let qr = encode(request.text(), request.ecc(), request.version())?;
    check_image_size(&qr, request)?;

    let mut image = helper::render_symbol(
        &qr,
        request.module_size(),
        request.border(),
        request.foreground().to_rgb(),
        request.background().to_rgb(),
    );

    if let Some(path) = request.logo() {
        let logo = image::open(path).map_err(|source| ComposeError::LogoUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "overlaying logo");
        helper::overlay_logo(&mut image, &logo);
    }

    if let Some(text) = request.frame_text() {
        debug!(caption = text, "framing symbol");
        image = helper::frame_with_caption(
            &image,
            text,
            request.foreground().to_rgb(),
            request.background().to_rgb(),
        );
    }

    Ok(image)
}

/// Encodes `text` starting at `version`, moving to the next version each time the payload
/// does not fit.
///
/// # Errors
///
/// [`ComposeError::EmptyPayload`] for empty text, [`ComposeError::PayloadTooLarge`] when even
/// [`Version::MAX`] is too small at `ecc`.
pub fn encode(text: &str, ecc: QrCodeEcc, version: Version) -> Result<QrCode, ComposeError> {
    if text.is_empty() {
        return Err(ComposeError::EmptyPayload);
    }

    let segs = [QrSegment::make_segment(text)];
    let mut candidate = version;
    loop {
        match QrCode::encode_segments(&segs, ecc, candidate, None) {
            Ok(qr) => {
                debug!(
                    requested = version.value(),
                    version = candidate.value(),
                    %ecc,
                    mode = ?segs[0].mode(),
                    "encoded symbol"
                );
                return Ok(qr);
            }
            Err(source) => match candidate.next() {
                Some(next) => candidate = next,
                None => return Err(ComposeError::PayloadTooLarge { ecc, source }),
            },
        }
    }
}

fn check_image_size(qr: &QrCode, request: &GenerationRequest) -> Result<(), ComposeError> {
    let side = (qr.size() as u64 + 2 * u64::from(request.border())) * u64::from(request.module_size());
    let (width, height) = match request.frame_text() {
        Some(_) => (side + u64::from(FRAME_EXTRA_WIDTH), side + u64::from(FRAME_EXTRA_HEIGHT)),
        None => (side, side),
    };
    if width * height > MAX_IMAGE_PIXELS {
        return Err(ComposeError::invalid(
            "image size",
            format!("{width}x{height}"),
            format!("exceeds {MAX_IMAGE_PIXELS} pixels; lower the module size or border"),
        ));
    }
    Ok(())
}

fn persist(image: &RgbImage, format: OutputFormat, path: &Path) -> Result<(), ComposeError> {
    let write_error = |source: PersistError| ComposeError::EncodeOrWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut encoded = Cursor::new(Vec::new());
    image
        .write_to(&mut encoded, format.image_format())
        .map_err(|e| write_error(e.into()))?;
    fs::write(path, encoded.into_inner()).map_err(|e| write_error(e.into()))?;
    Ok(())
}
