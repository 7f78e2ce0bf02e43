//! Image geometry and rendering.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Solve** | [`solve_dimensions`] (pure) |
//! | **Render** | [`render`] over a [`SurfaceBackend`] |
//! | **Scale** | `image::imageops::resize`, filter picked by smoothing quality |
//! | **Encode** | `image` JPEG / PNG / WebP encoders + `base64` envelope |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing a render
//! - **Backend**: [`SurfaceBackend`] / [`RenderSurface`] traits + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{
    BackendError, Dimensions, RenderSurface, SmoothingQuality, SurfaceBackend, Transform2D,
};
pub use calculations::{physical_surface_size, rotation_offset, solve_dimensions};
pub use operations::{RenderPlan, plan_render, render};
pub use params::{CompressFormat, Constraints, EncodingOptions, ParamError, Quality, Rotation};
pub use rust_backend::RustBackend;
