//! Asynchronous file reading and image decoding.
//!
//! The resize pipeline has exactly two suspension points: reading the input
//! file into a data URI, and decoding that data URI into pixels. Each sits
//! behind a trait so callers can swap in their own I/O:
//!
//! - [`FileReader`]: `InputFile` → `data:<type>;base64,<payload>`
//! - [`ImageLoader`]: data URI → [`DynamicImage`]
//!
//! [`DataUrlReader`] and [`DataUrlLoader`] are the stock implementations
//! (tokio file I/O, `image` decoders).

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Content type used by the reader when the file declares none.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Extension → content type, for files opened from disk.
const KNOWN_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("avif", "image/avif"),
    ("svg", "image/svg+xml"),
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("html", "text/html"),
    ("json", "application/json"),
    ("pdf", "application/pdf"),
];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid data URI: {0}")]
    InvalidDataUrl(String),
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Image decode failed: {0}")]
    Image(String),
}

/// Where the bytes of an [`InputFile`] live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Bytes(Vec<u8>),
    /// Read lazily by the [`FileReader`].
    Path(PathBuf),
}

/// A file handed to the resizer: a name, a declared content type (possibly
/// empty) and its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub name: String,
    pub mime_type: String,
    pub content: FileContent,
}

impl InputFile {
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content: FileContent::Bytes(bytes),
        }
    }

    /// Reference a file on disk. The content type comes from the extension
    /// and is empty for unknown extensions. Nothing is read yet.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            mime_type: mime_type_for_path(&path).to_string(),
            content: FileContent::Path(path),
        }
    }

    /// An undeclared type is given the benefit of the doubt.
    pub fn is_image(&self) -> bool {
        self.mime_type.is_empty() || self.mime_type.contains("image")
    }
}

/// Content type for a path's extension (case-insensitive), or `""`.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return "";
    };
    KNOWN_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
        .unwrap_or("")
}

/// Reads a whole file into a data URI.
#[async_trait]
pub trait FileReader: Send + Sync {
    async fn read_as_data_url(&self, file: &InputFile) -> Result<String, LoadError>;
}

/// Turns a data URI into a decoded image.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, data_url: &str) -> Result<DynamicImage, LoadError>;
}

/// Stock [`FileReader`]: in-memory bytes as-is, paths through `tokio::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataUrlReader;

#[async_trait]
impl FileReader for DataUrlReader {
    async fn read_as_data_url(&self, file: &InputFile) -> Result<String, LoadError> {
        let bytes: Cow<'_, [u8]> = match &file.content {
            FileContent::Bytes(bytes) => Cow::Borrowed(bytes.as_slice()),
            FileContent::Path(path) => Cow::Owned(tokio::fs::read(path).await?),
        };
        let mime_type = if file.mime_type.is_empty() {
            FALLBACK_MIME_TYPE
        } else {
            file.mime_type.as_str()
        };
        debug!(name = %file.name, bytes = bytes.len(), mime_type, "read file");
        Ok(format!("data:{mime_type};base64,{}", STANDARD.encode(&bytes)))
    }
}

/// Split `data:<type>;base64,<payload>` and decode the payload.
pub fn parse_data_url(data_url: &str) -> Result<(&str, Vec<u8>), LoadError> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| LoadError::InvalidDataUrl("missing 'data:' scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| LoadError::InvalidDataUrl("missing ',' separator".to_string()))?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| LoadError::InvalidDataUrl("payload is not base64".to_string()))?;
    Ok((mime_type, STANDARD.decode(payload)?))
}

/// Stock [`ImageLoader`]: decodes with whatever formats `image` was built with.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataUrlLoader;

#[async_trait]
impl ImageLoader for DataUrlLoader {
    async fn load(&self, data_url: &str) -> Result<DynamicImage, LoadError> {
        let (mime_type, bytes) = parse_data_url(data_url)?;
        let image =
            image::load_from_memory(&bytes).map_err(|e| LoadError::Image(e.to_string()))?;
        debug!(
            mime_type,
            width = image.width(),
            height = image.height(),
            "decoded image"
        );
        Ok(image)
    }
}
