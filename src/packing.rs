//! Data URI → binary container conversion.
//!
//! A render produces an envelope like `data:image/webp;base64,UklGR...`. For
//! binary outputs the payload is decoded and split into fixed-size chunks
//! ([`chunk_base64`]), which are then assembled into an anonymous [`Blob`] or a
//! [`NamedFile`]. Chunking mirrors how binary-container constructors accept a
//! list of byte segments instead of one large array.
//!
//! ## File naming
//!
//! [`derive_file_name`] swaps a trailing `png`, `jpeg`, `jpg` or `webp`
//! (any case) for the output format name. The match is on the bare suffix,
//! not on a dotted extension:
//!
//! - `photo.PNG` + webp → `photo.webp`
//! - `scan.jpg` + png → `scan.png`
//! - `notes.gif` + jpeg → `notes.gifjpeg` (no recognised suffix, appended)

use crate::imaging::CompressFormat;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Size of every chunk except possibly the last.
pub const CHUNK_SIZE: usize = 512;

static IMAGE_DATA_URL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:image/(png|jpeg|jpg|webp);base64,").expect("prefix pattern is valid")
});

static IMAGE_EXTENSION_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(png|jpeg|jpg|webp)$").expect("suffix pattern is valid")
});

#[derive(Error, Debug)]
pub enum PackError {
    #[error("Malformed base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// An anonymous binary object tagged with a content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Blob {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A [`Blob`] with a file name attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedFile {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl NamedFile {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Strip an image data-URI prefix (if any), decode, and split into
/// [`CHUNK_SIZE`]-byte chunks. An empty payload yields no chunks.
pub fn chunk_base64(payload: &str) -> Result<Vec<Vec<u8>>, PackError> {
    let encoded = IMAGE_DATA_URL_PREFIX.replace(payload, "");
    let bytes = STANDARD.decode(encoded.as_bytes())?;
    Ok(bytes.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect())
}

pub fn to_blob(chunks: Vec<Vec<u8>>, mime_type: &str) -> Blob {
    Blob {
        mime_type: mime_type.to_string(),
        data: chunks.concat(),
    }
}

pub fn to_file(chunks: Vec<Vec<u8>>, file_name: &str, mime_type: &str) -> NamedFile {
    NamedFile {
        name: file_name.to_string(),
        mime_type: mime_type.to_string(),
        data: chunks.concat(),
    }
}

/// Name for the re-encoded file. See the [module docs](self) for the rules.
pub fn derive_file_name(original: &str, format: CompressFormat) -> String {
    let stem = IMAGE_EXTENSION_SUFFIX.replace(original, "");
    format!("{stem}{}", format.name())
}
