//! Generation requests and the options they are resolved from.
//!
//! Front ends collect loosely typed answers into [`ComposeOptions`], where every field is
//! optional. [`ComposeOptions::resolve`] applies the documented defaults and validates the
//! free-form values once, producing an immutable [`GenerationRequest`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::ImageFormat;
use tracing::warn;

use crate::color::Color;
use crate::constants::{
    DEFAULT_BACK_COLOR, DEFAULT_BORDER, DEFAULT_ERROR_CORRECTION, DEFAULT_FILENAME,
    DEFAULT_FILL_COLOR, DEFAULT_FORMAT, DEFAULT_MODULE_SIZE, DEFAULT_VERSION, MAX_BORDER,
    MAX_MODULE_SIZE,
};
use crate::error::ComposeError;
use crate::qrcode::{QrCodeEcc, Version};

/// Raw options for one composition. `None` means "use the default".
///
/// | field | default |
/// |---|---|
/// | `destination` | `qr_code.png` |
/// | `module_size` | 10 |
/// | `border` | 4 |
/// | `fill_color` | `black` |
/// | `back_color` | `white` |
/// | `version` | 1 |
/// | `error_correction` | `L` (unrecognized values also mean `L`) |
/// | `logo` | none |
/// | `format` | `PNG` |
/// | `frame_text` | none |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeOptions {
    pub text: String,
    pub destination: Option<PathBuf>,
    pub module_size: Option<u32>,
    pub border: Option<u32>,
    pub fill_color: Option<String>,
    pub back_color: Option<String>,
    pub version: Option<u32>,
    pub error_correction: Option<String>,
    pub logo: Option<PathBuf>,
    pub format: Option<String>,
    pub frame_text: Option<String>,
}

impl ComposeOptions {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Fills every unset field from `fallback`. An empty `text` also takes the fallback's.
    pub fn or(self, fallback: ComposeOptions) -> ComposeOptions {
        ComposeOptions {
            text: if self.text.is_empty() { fallback.text } else { self.text },
            destination: self.destination.or(fallback.destination),
            module_size: self.module_size.or(fallback.module_size),
            border: self.border.or(fallback.border),
            fill_color: self.fill_color.or(fallback.fill_color),
            back_color: self.back_color.or(fallback.back_color),
            version: self.version.or(fallback.version),
            error_correction: self.error_correction.or(fallback.error_correction),
            logo: self.logo.or(fallback.logo),
            format: self.format.or(fallback.format),
            frame_text: self.frame_text.or(fallback.frame_text),
        }
    }

    /// Applies defaults and validates every field.
    ///
    /// An empty `text` is accepted here; composing it fails with
    /// [`ComposeError::EmptyPayload`]. An empty logo path or caption counts as absent.
    pub fn resolve(self) -> Result<GenerationRequest, ComposeError> {
        let module_size = self.module_size.unwrap_or(DEFAULT_MODULE_SIZE);
        if !(1..=MAX_MODULE_SIZE).contains(&module_size) {
            return Err(ComposeError::invalid(
                "module size",
                module_size.to_string(),
                format!("must be between 1 and {MAX_MODULE_SIZE} pixels"),
            ));
        }

        let border = self.border.unwrap_or(DEFAULT_BORDER);
        if border > MAX_BORDER {
            return Err(ComposeError::invalid(
                "border",
                border.to_string(),
                format!("must be at most {MAX_BORDER} modules"),
            ));
        }

        let fill_color = self.fill_color.as_deref().unwrap_or(DEFAULT_FILL_COLOR);
        let foreground: Color = fill_color
            .parse()
            .map_err(|e| ComposeError::invalid("fill color", fill_color, e))?;

        let back_color = self.back_color.as_deref().unwrap_or(DEFAULT_BACK_COLOR);
        let background: Color = back_color
            .parse()
            .map_err(|e| ComposeError::invalid("background color", back_color, e))?;

        let requested_version = self.version.unwrap_or(DEFAULT_VERSION);
        let version = Version::checked(requested_version).ok_or_else(|| {
            ComposeError::invalid("version", requested_version.to_string(), "must be between 1 and 40")
        })?;

        let tier = self.error_correction.as_deref().unwrap_or(DEFAULT_ERROR_CORRECTION);
        let ecc = QrCodeEcc::parse(tier).unwrap_or_else(|| {
            warn!(tier, "unrecognized error correction level, using L");
            QrCodeEcc::Low
        });

        let format_name = self.format.as_deref().unwrap_or(DEFAULT_FORMAT);
        let format: OutputFormat = format_name
            .parse()
            .map_err(|e| ComposeError::invalid("output format", format_name, e))?;

        Ok(GenerationRequest {
            text: self.text,
            destination: self.destination.unwrap_or_else(|| PathBuf::from(DEFAULT_FILENAME)),
            module_size,
            border,
            foreground,
            background,
            version,
            ecc,
            logo: self.logo.filter(|path| !path.as_os_str().is_empty()),
            format,
            frame_text: self.frame_text.filter(|text| !text.is_empty()),
        })
    }
}

/// A validated, immutable description of one QR code image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    text: String,
    destination: PathBuf,
    module_size: u32,
    border: u32,
    foreground: Color,
    background: Color,
    version: Version,
    ecc: QrCodeEcc,
    logo: Option<PathBuf>,
    format: OutputFormat,
    frame_text: Option<String>,
}

impl GenerationRequest {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn module_size(&self) -> u32 {
        self.module_size
    }

    pub fn border(&self) -> u32 {
        self.border
    }

    pub fn foreground(&self) -> Color {
        self.foreground
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// The version encoding starts from; the symbol may end up larger.
    pub fn version(&self) -> Version {
        self.version
    }

    pub fn ecc(&self) -> QrCodeEcc {
        self.ecc
    }

    pub fn logo(&self) -> Option<&Path> {
        self.logo.as_deref()
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn frame_text(&self) -> Option<&str> {
        self.frame_text.as_deref()
    }
}

/// Image codec used for the written file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFormat(ImageFormat);

impl OutputFormat {
    pub const PNG: OutputFormat = OutputFormat(ImageFormat::Png);
    pub const JPEG: OutputFormat = OutputFormat(ImageFormat::Jpeg);

    pub fn image_format(self) -> ImageFormat {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a known image format")]
pub struct ParseFormatError;

impl FromStr for OutputFormat {
    type Err = ParseFormatError;

    /// Accepts codec names and file extensions in any case: `PNG`, `jpeg`, `jpg`, `.webp`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches('.');
        if name.is_empty() {
            return Err(ParseFormatError);
        }
        ImageFormat::from_extension(name)
            .map(OutputFormat)
            .ok_or(ParseFormatError)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ext = self.0.extensions_str().first().copied().unwrap_or("?");
        write!(f, "{}", ext.to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let request = ComposeOptions::new("https://example.com").resolve().unwrap();
        assert_eq!(request.text(), "https://example.com");
        assert_eq!(request.destination(), Path::new("qr_code.png"));
        assert_eq!(request.module_size(), 10);
        assert_eq!(request.border(), 4);
        assert_eq!(request.foreground(), Color::BLACK);
        assert_eq!(request.background(), Color::WHITE);
        assert_eq!(request.version(), Version::MIN);
        assert_eq!(request.ecc(), QrCodeEcc::Low);
        assert_eq!(request.logo(), None);
        assert_eq!(request.format(), OutputFormat::PNG);
        assert_eq!(request.frame_text(), None);
    }

    #[test]
    fn unknown_tier_falls_back_to_low() {
        let z = ComposeOptions {
            error_correction: Some("Z".into()),
            ..ComposeOptions::new("x")
        };
        let l = ComposeOptions {
            error_correction: Some("L".into()),
            ..ComposeOptions::new("x")
        };
        assert_eq!(z.resolve().unwrap(), l.resolve().unwrap());
    }

    #[test]
    fn rejects_bad_colors() {
        let options = ComposeOptions {
            fill_color: Some("blurple".into()),
            ..ComposeOptions::new("x")
        };
        let err = options.resolve().unwrap_err();
        assert!(matches!(err, ComposeError::InvalidParameter { field: "fill color", .. }));

        let options = ComposeOptions {
            back_color: Some("#12".into()),
            ..ComposeOptions::new("x")
        };
        let err = options.resolve().unwrap_err();
        assert!(matches!(err, ComposeError::InvalidParameter { field: "background color", .. }));
    }

    #[test]
    fn rejects_out_of_range_numbers() {
        for version in [0, 41] {
            let options = ComposeOptions {
                version: Some(version),
                ..ComposeOptions::new("x")
            };
            assert!(matches!(
                options.resolve(),
                Err(ComposeError::InvalidParameter { field: "version", .. })
            ));
        }

        let options = ComposeOptions {
            module_size: Some(0),
            ..ComposeOptions::new("x")
        };
        assert!(matches!(
            options.resolve(),
            Err(ComposeError::InvalidParameter { field: "module size", .. })
        ));

        let options = ComposeOptions {
            border: Some(MAX_BORDER + 1),
            ..ComposeOptions::new("x")
        };
        assert!(options.resolve().is_err());

        // A zero-width quiet zone is allowed
        let options = ComposeOptions {
            border: Some(0),
            ..ComposeOptions::new("x")
        };
        assert_eq!(options.resolve().unwrap().border(), 0);
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("PNG".parse::<OutputFormat>(), Ok(OutputFormat::PNG));
        assert_eq!("jpeg".parse::<OutputFormat>(), Ok(OutputFormat::JPEG));
        assert_eq!("JPG".parse::<OutputFormat>(), Ok(OutputFormat::JPEG));
        assert_eq!(".bmp".parse::<OutputFormat>().unwrap().image_format(), ImageFormat::Bmp);
        assert_eq!("docx".parse::<OutputFormat>(), Err(ParseFormatError));
        assert_eq!("".parse::<OutputFormat>(), Err(ParseFormatError));
        assert_eq!(OutputFormat::PNG.to_string(), "PNG");
    }

    #[test]
    fn empty_logo_and_caption_are_absent() {
        let request = ComposeOptions {
            logo: Some(PathBuf::new()),
            frame_text: Some(String::new()),
            ..ComposeOptions::new("x")
        }
        .resolve()
        .unwrap();
        assert_eq!(request.logo(), None);
        assert_eq!(request.frame_text(), None);

        // Whitespace is real caption content
        let request = ComposeOptions {
            frame_text: Some(" ".into()),
            ..ComposeOptions::new("x")
        }
        .resolve()
        .unwrap();
        assert_eq!(request.frame_text(), Some(" "));
    }

    #[test]
    fn unset_fields_come_from_the_fallback() {
        let answers = ComposeOptions {
            fill_color: Some("red".into()),
            ..ComposeOptions::new("https://asked.example")
        };
        let flags = ComposeOptions {
            fill_color: Some("navy".into()),
            back_color: Some("ivory".into()),
            version: Some(3),
            ..ComposeOptions::new("https://flag.example")
        };
        let merged = answers.or(flags);
        assert_eq!(merged.text, "https://asked.example");
        assert_eq!(merged.fill_color.as_deref(), Some("red"));
        assert_eq!(merged.back_color.as_deref(), Some("ivory"));
        assert_eq!(merged.version, Some(3));
        assert_eq!(merged.logo, None);

        let merged = ComposeOptions::default().or(ComposeOptions::new("fallback"));
        assert_eq!(merged.text, "fallback");
    }

    #[test]
    fn empty_text_resolves() {
        // Rejected later, when composing
        assert!(ComposeOptions::new("").resolve().is_ok());
    }
}
