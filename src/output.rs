//! CLI output formatting for resize results.
//!
//! # Output Format
//!
//! The summary leads with the input and what it became, followed by indented
//! context lines:
//!
//! ```text
//! photo.PNG → photo.webp
//!     Type: image/webp
//!     Size: 18.4 KB
//!     Written: out/photo.webp
//! ```
//!
//! ```text
//! scan.jpg → base64 data URI
//!     Type: image/jpeg
//!     Length: 24612 chars
//!     Written: stdout
//! ```
//!
//! # Architecture
//!
//! [`format_artifact`] returns `Vec<String>` for testability and
//! [`print_artifact`] writes it to stderr, keeping stdout free for the data URI
//! itself. Format functions are pure: no I/O, no side effects.

use crate::pipeline::OutputArtifact;
use std::path::Path;

// ============================================================================
// Helpers
// ============================================================================

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte count.
fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

/// Content type from a `data:<type>;base64,...` header, if there is one.
fn data_url_mime(data_url: &str) -> Option<&str> {
    data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(';'))
        .map(|(mime, _)| mime)
}

// ============================================================================
// Resize summary
// ============================================================================

/// Format the summary for one resize.
///
/// `destination` is where the bytes went; `None` means stdout.
pub fn format_artifact(
    source_name: &str,
    artifact: &OutputArtifact,
    destination: Option<&Path>,
) -> Vec<String> {
    let ctx = indent(1);
    let mut lines = Vec::new();

    match artifact {
        OutputArtifact::Base64(url) => {
            lines.push(format!("{source_name} → base64 data URI"));
            if let Some(mime) = data_url_mime(url) {
                lines.push(format!("{ctx}Type: {mime}"));
            }
            lines.push(format!("{ctx}Length: {} chars", url.len()));
        }
        OutputArtifact::Blob(blob) => {
            lines.push(format!("{source_name} → blob"));
            lines.push(format!("{ctx}Type: {}", blob.mime_type));
            lines.push(format!("{ctx}Size: {}", format_size(blob.len())));
        }
        OutputArtifact::File(file) => {
            lines.push(format!("{source_name} → {}", file.name));
            lines.push(format!("{ctx}Type: {}", file.mime_type));
            lines.push(format!("{ctx}Size: {}", format_size(file.len())));
        }
    }

    let written = match destination {
        Some(path) => path.display().to_string(),
        None => "stdout".to_string(),
    };
    lines.push(format!("{ctx}Written: {written}"));
    lines
}

pub fn print_artifact(source_name: &str, artifact: &OutputArtifact, destination: Option<&Path>) {
    for line in format_artifact(source_name, artifact, destination) {
        eprintln!("{}", line);
    }
}
