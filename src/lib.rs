//! # qrcompose
//!
//! Generate QR code images for URLs, optionally decorated with a centered logo and a caption
//! frame.
//!
//! A composition is one linear pipeline: the text is encoded into a QR Code Model 2 symbol,
//! drawn to an RGB image, optionally decorated, and written in the requested image format.
//! Nothing touches the disk until the final image has been encoded, so a failed composition
//! leaves no file behind.
//!
//! ## Features
//!
//! - Encode text at any version from 1 to 40, growing the version when the payload needs it.
//! - Four error correction levels: L, M, Q, H.
//! - Custom module size, quiet zone, and colors given as names, `#hex` or `rgb(r, g, b)`.
//! - Centered logo overlay that honors the logo's transparency.
//! - Caption frame drawn with a built-in bitmap font.
//! - Any output format the `image` crate can encode (PNG, JPEG, BMP, ...).
//!
//! ## Example
//!
//! ```no_run
//! use qrcompose::{compose, ComposeOptions};
//!
//! let request = ComposeOptions {
//!     destination: Some("qr.png".into()),
//!     fill_color: Some("navy".into()),
//!     error_correction: Some("H".into()),
//!     logo: Some("logo.png".into()),
//!     frame_text: Some("Scan me".into()),
//!     ..ComposeOptions::new("https://example.com")
//! }
//! .resolve()
//! .expect("valid options");
//!
//! compose(&request).expect("QR code written");
//! ```
//!
//! Render in memory instead of writing a file:
//!
//! ```rust
//! use qrcompose::{render, ComposeOptions};
//!
//! let request = ComposeOptions::new("https://example.com").resolve().unwrap();
//! let img = render(&request).unwrap();
//! assert_eq!(img.dimensions(), (290, 290));
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: QR symbol encoding.
//! - [`helper`]: Drawing symbols, logos and caption frames.
//! - [`compose`](mod@compose): The end-to-end pipeline.
//! - [`request`]: Options, defaults and validated requests.
//! - [`prompt`]: The line-prompt front end.

pub mod caption;
pub mod color;
pub mod compose;
pub mod constants;
pub mod error;
pub mod helper;
pub mod logging;
pub mod prompt;
pub mod qrcode;
pub mod request;

pub use color::Color;
pub use compose::{compose, encode, render};
pub use error::{ComposeError, PersistError};
pub use request::{ComposeOptions, GenerationRequest, OutputFormat};
