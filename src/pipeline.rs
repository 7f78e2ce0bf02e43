//! The resize pipeline: validate → read → decode → render → pack.
//!
//! [`Resizer::resize`] checks its input synchronously and only then hands back
//! a future. A missing file or a declared non-image type is an `Err` from the
//! call itself, before any I/O is scheduled:
//!
//! ```no_run
//! # use image_file_resizer::imaging::Constraints;
//! # use image_file_resizer::loader::InputFile;
//! # use image_file_resizer::pipeline::{ResizeRequest, Resizer};
//! # async fn run() -> Result<(), image_file_resizer::pipeline::ResizeError> {
//! let resizer = Resizer::new();
//! let file = InputFile::from_path("photo.jpg");
//! let pending = resizer.resize(Some(file), ResizeRequest::new(Constraints::max(800, 600)))?;
//! let artifact = pending.await?;
//! # Ok(())
//! # }
//! ```
//!
//! The returned future suspends twice (file read, image decode); everything
//! after that is synchronous. Dropping the future abandons the resize. There is
//! no internal timeout: a reader or loader that never completes leaves the
//! future pending.

use crate::imaging::{
    BackendError, CompressFormat, Constraints, EncodingOptions, RustBackend, SurfaceBackend,
    render,
};
use crate::loader::{DataUrlLoader, DataUrlReader, FileReader, ImageLoader, InputFile, LoadError};
use crate::packing::{Blob, NamedFile, PackError, chunk_base64, derive_file_name, to_blob, to_file};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("File not found")]
    FileNotFound,
    #[error("File is not an image: {name} ({mime_type})")]
    NotAnImage { name: String, mime_type: String },
    #[error("Failed to read {name}: {source}")]
    Read { name: String, source: LoadError },
    #[error("Failed to decode {name}: {source}")]
    Decode { name: String, source: LoadError },
    #[error("Render failed: {0}")]
    Render(#[from] BackendError),
    #[error("Packing failed: {0}")]
    Pack(#[from] PackError),
}

/// Which representation [`Resizer::resize`] resolves with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    /// The data URI string.
    #[default]
    Base64,
    /// Decoded bytes with a content type.
    Blob,
    /// Decoded bytes with a content type and a derived file name.
    File,
}

impl FromStr for OutputType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base64" => Ok(OutputType::Base64),
            "blob" => Ok(OutputType::Blob),
            "file" => Ok(OutputType::File),
            _ => Err(format!(
                "unsupported output type '{s}' (expected base64, blob or file)"
            )),
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputType::Base64 => "base64",
            OutputType::Blob => "blob",
            OutputType::File => "file",
        })
    }
}

/// Final result of a resize, one variant per [`OutputType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputArtifact {
    Base64(String),
    Blob(Blob),
    File(NamedFile),
}

impl OutputArtifact {
    pub fn output_type(&self) -> OutputType {
        match self {
            OutputArtifact::Base64(_) => OutputType::Base64,
            OutputArtifact::Blob(_) => OutputType::Blob,
            OutputArtifact::File(_) => OutputType::File,
        }
    }
}

/// What to do with one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeRequest {
    pub constraints: Constraints,
    pub encoding: EncodingOptions,
    pub output_type: OutputType,
}

impl ResizeRequest {
    /// Default encoding (jpeg, quality 100, no rotation), base64 output.
    pub fn new(constraints: Constraints) -> Self {
        Self {
            constraints,
            encoding: EncodingOptions::default(),
            output_type: OutputType::default(),
        }
    }

    pub fn with_encoding(mut self, encoding: EncodingOptions) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_output_type(mut self, output_type: OutputType) -> Self {
        self.output_type = output_type;
        self
    }
}

/// Resize pipeline over an injected reader, loader and surface backend.
///
/// Holds no per-call state: concurrent resizes share nothing but `&self`.
pub struct Resizer<R = DataUrlReader, L = DataUrlLoader, B = RustBackend> {
    reader: R,
    loader: L,
    backend: B,
}

impl Resizer {
    /// Stock pipeline: tokio file reads, `image` decoding, software surface.
    pub fn new() -> Self {
        Self::with_parts(DataUrlReader, DataUrlLoader, RustBackend::new())
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, L, B> Resizer<R, L, B>
where
    R: FileReader,
    L: ImageLoader,
    B: SurfaceBackend,
{
    pub fn with_parts(reader: R, loader: L, backend: B) -> Self {
        Self {
            reader,
            loader,
            backend,
        }
    }

    /// Validate `file` and return the pending resize.
    ///
    /// # Errors
    /// * [`ResizeError::FileNotFound`] if `file` is `None`
    /// * [`ResizeError::NotAnImage`] if the declared type is set and does not
    ///   contain `"image"`
    ///
    /// Both are returned before any asynchronous work exists. Failures while
    /// reading, decoding, rendering or packing come out of the future.
    pub fn resize(
        &self,
        file: Option<InputFile>,
        request: ResizeRequest,
    ) -> Result<impl Future<Output = Result<OutputArtifact, ResizeError>> + '_, ResizeError> {
        let file = file.ok_or(ResizeError::FileNotFound)?;
        if !file.is_image() {
            return Err(ResizeError::NotAnImage {
                name: file.name,
                mime_type: file.mime_type,
            });
        }
        Ok(self.run(file, request))
    }

    async fn run(
        &self,
        file: InputFile,
        request: ResizeRequest,
    ) -> Result<OutputArtifact, ResizeError> {
        let data_url = self
            .reader
            .read_as_data_url(&file)
            .await
            .map_err(|source| ResizeError::Read {
                name: file.name.clone(),
                source,
            })?;

        let image = self
            .loader
            .load(&data_url)
            .await
            .map_err(|source| ResizeError::Decode {
                name: file.name.clone(),
                source,
            })?;
        drop(data_url);

        let encoded = render(
            &self.backend,
            &image,
            &request.constraints,
            &request.encoding,
        )?;

        let artifact = pack(encoded, &file.name, request.encoding.format, request.output_type)?;
        info!(
            name = %file.name,
            output = %artifact.output_type(),
            format = %request.encoding.format,
            "resized"
        );
        Ok(artifact)
    }
}

/// Route an encoded data URI into the requested representation.
pub fn pack(
    encoded: String,
    original_name: &str,
    format: CompressFormat,
    output_type: OutputType,
) -> Result<OutputArtifact, PackError> {
    let mime_type = format.mime_type();
    Ok(match output_type {
        OutputType::Base64 => OutputArtifact::Base64(encoded),
        OutputType::Blob => OutputArtifact::Blob(to_blob(chunk_base64(&encoded)?, mime_type)),
        OutputType::File => {
            let name = derive_file_name(original_name, format);
            debug!(from = original_name, to = %name, "renamed output");
            OutputArtifact::File(to_file(chunk_base64(&encoded)?, &name, mime_type))
        }
    })
}
