//! # Test Helpers
//!
//! Shared helpers for integration tests: scratch directories, request building and
//! decoding produced images back into their payload.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbImage};
use qrcompose::{ComposeOptions, GenerationRequest};
use tempfile::TempDir;

/// A scratch directory that disappears with the test.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Options writing `text` to `name` inside the scratch directory.
    pub fn options(&self, text: &str, name: &str) -> ComposeOptions {
        ComposeOptions {
            destination: Some(self.path(name)),
            ..ComposeOptions::new(text)
        }
    }

    pub fn request(&self, text: &str, name: &str) -> GenerationRequest {
        self.options(text, name).resolve().expect("options should resolve")
    }

    pub fn write_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).expect("Failed to write file");
        path
    }

    pub fn file_count(&self) -> usize {
        std::fs::read_dir(self.dir.path())
            .expect("Failed to list temp dir")
            .count()
    }
}

/// A decoded symbol: its version and raw payload bytes.
pub struct Decoded {
    pub version: usize,
    pub payload: Vec<u8>,
}

/// Decodes the single QR symbol in `img`.
pub fn decode(img: &RgbImage) -> Decoded {
    let gray = DynamicImage::ImageRgb8(img.clone()).to_luma8();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        gray.width() as usize,
        gray.height() as usize,
        |x, y| gray.get_pixel(x as u32, y as u32).0[0],
    );
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one symbol");

    let mut payload = Vec::new();
    let meta = grids[0].decode_to(&mut payload).expect("symbol should decode");
    Decoded {
        version: meta.version.0,
        payload,
    }
}

/// Opens an image written by a test and decodes it.
pub fn decode_file(path: &Path) -> Decoded {
    let img = image::open(path).expect("written image should open").to_rgb8();
    decode(&img)
}
