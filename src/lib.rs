//! # Image File Resizer
//!
//! Resizes an image file so it fits a constraint box, optionally rotating it
//! by a quarter turn, and re-encodes it as JPEG, PNG or WebP. The result comes
//! back as a base64 data URI, a binary blob, or a binary file with a derived
//! name.
//!
//! # Architecture: One Pipeline
//!
//! ```text
//! InputFile ─validate─▶ read (data URI) ─▶ decode ─▶ solve + render ─▶ pack
//!            (sync)        (async)          (async)     (sync)         (sync)
//! ```
//!
//! Validation happens before any future exists, so a missing file or a
//! declared non-image type fails at the call site. The two I/O steps sit
//! behind traits ([`loader::FileReader`], [`loader::ImageLoader`]) and the
//! drawing surface behind another ([`imaging::SurfaceBackend`]), so tests run
//! the whole pipeline against recorded mocks.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`pipeline`] | [`pipeline::Resizer`]: validate, read, decode, render, pack |
//! | [`imaging`] | Dimension solving, rotation geometry, surfaces and encoding |
//! | [`loader`] | Input files, data URI reading and image decoding |
//! | [`packing`] | Data URI → chunked bytes → blob / named file |
//! | [`config`] | `config.toml` loading, validation and merging |
//! | [`output`] | CLI summary formatting |
//!
//! # Design Decisions
//!
//! ## Height Wins
//!
//! The width clamp runs first and the height clamp second, each against the
//! *original* dimensions. When an image violates both the width and height
//! limits, the height result overwrites the width result, so the output can
//! exceed `max_width`.
//!
//! ## Software Rendering
//!
//! Scaling, decoding and JPEG/PNG encoding use the `image` crate; lossy WebP
//! goes through the `webp` bindings. The software surface in
//! [`imaging::RustBackend`] composites with a 2D affine transform the same way
//! a browser canvas does, so rotation results are pixel-compatible with
//! canvas-based resizers.

pub mod config;
pub mod imaging;
pub mod loader;
pub mod output;
pub mod packing;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_helpers;
