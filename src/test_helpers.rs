//! Shared test utilities for the resizer test suite.
//!
//! Provides in-memory image fixtures and instrumented implementations of the
//! loader traits, so pipeline tests can check *whether* I/O happened as well
//! as what came out.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let reader = CountingReader::default();
//! let file = png_file("photo.png", 40, 20);
//! // ... run a resize ...
//! assert_eq!(reader.calls.load(Ordering::SeqCst), 1);
//! ```

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::loader::{
    DataUrlReader, FileReader, ImageLoader, InputFile, LoadError, parse_data_url,
};

// =========================================================================
// Fixtures
// =========================================================================

/// Encode a `width`x`height` gradient as PNG bytes.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut cursor, ImageFormat::Png)
        .unwrap();
    cursor.into_inner()
}

/// An in-memory PNG upload named `name`.
pub fn png_file(name: &str, width: u32, height: u32) -> InputFile {
    InputFile::from_bytes(name, "image/png", png_bytes(width, height))
}

/// Decode the image inside a data URI. Panics on anything malformed.
pub fn decode_data_url(data_url: &str) -> DynamicImage {
    let (_, bytes) = parse_data_url(data_url).unwrap();
    image::load_from_memory(&bytes).unwrap()
}

// =========================================================================
// Instrumented loaders
// =========================================================================

/// [`DataUrlReader`] that counts calls, optionally failing every read.
#[derive(Default)]
pub struct CountingReader {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl CountingReader {
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }
}

#[async_trait]
impl FileReader for CountingReader {
    async fn read_as_data_url(&self, file: &InputFile) -> Result<String, LoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LoadError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} vanished", file.name),
            )));
        }
        DataUrlReader.read_as_data_url(file).await
    }
}

/// [`ImageLoader`] that rejects everything.
pub struct FailingLoader;

#[async_trait]
impl ImageLoader for FailingLoader {
    async fn load(&self, _data_url: &str) -> Result<DynamicImage, LoadError> {
        Err(LoadError::Image("unsupported image".to_string()))
    }
}
