//! Errors raised while composing a QR code image.
//!
//! Every failure is terminal for the current composition. Nothing is written to disk
//! unless the final encode succeeded, so no variant implies partial output.
//!
//! Messages describe the failing step only; the underlying cause is reachable through
//! [`std::error::Error::source`] and shows up when the chain is printed with `{:#}`.

use std::path::PathBuf;

use crate::qrcode::{DataTooLong, QrCodeEcc};

/// Failure of a single composition.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("nothing to encode: the text is empty")]
    EmptyPayload,

    #[error("payload does not fit even a version 40 symbol at error correction level {ecc}")]
    PayloadTooLarge {
        ecc: QrCodeEcc,
        #[source]
        source: DataTooLong,
    },

    #[error("cannot read logo image '{}'", path.display())]
    LogoUnreadable {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot write '{}'", path.display())]
    EncodeOrWrite {
        path: PathBuf,
        #[source]
        source: PersistError,
    },

    #[error("invalid {field} '{value}': {reason}")]
    InvalidParameter {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl ComposeError {
    pub(crate) fn invalid(field: &'static str, value: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidParameter {
            field,
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

/// Why the final image could not be persisted.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Encode(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
