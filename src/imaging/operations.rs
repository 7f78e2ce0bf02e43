//! High-level image operations.
//!
//! These functions combine calculations with backend execution: solve the
//! geometry, then drive a [`RenderSurface`] through it.

use super::backend::{BackendError, Dimensions, RenderSurface, SmoothingQuality, SurfaceBackend};
use super::calculations::{physical_surface_size, rotation_offset, solve_dimensions};
use super::params::{Constraints, EncodingOptions, Rotation};
use image::DynamicImage;
use tracing::debug;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Geometry of one render, computed before any surface exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPlan {
    /// Size the image is drawn at.
    pub solved: Dimensions,
    /// Size of the allocated surface.
    pub surface: Dimensions,
    pub rotation: Rotation,
    /// Translation applied after rotating.
    pub offset: (f64, f64),
}

/// Plan a render without executing it.
pub fn plan_render(source: Dimensions, constraints: &Constraints, rotation: Rotation) -> RenderPlan {
    let solved = solve_dimensions(source.height, source.width, constraints);
    let surface = physical_surface_size(solved, rotation);
    RenderPlan {
        solved,
        surface,
        rotation,
        offset: rotation_offset(rotation, surface),
    }
}

/// Resize, rotate and encode `image` into a data URI.
///
/// The surface is created and dropped inside this call. A backend that
/// cannot provide a surface aborts the render with
/// [`BackendError::SurfaceUnavailable`].
pub fn render(
    backend: &impl SurfaceBackend,
    image: &DynamicImage,
    constraints: &Constraints,
    options: &EncodingOptions,
) -> Result<String> {
    let plan = plan_render(Dimensions::of(image), constraints, options.rotation);
    debug!(
        source_width = image.width(),
        source_height = image.height(),
        width = plan.solved.width,
        height = plan.solved.height,
        rotation = options.rotation.degrees(),
        "rendering"
    );

    let mut surface = backend.create_surface(plan.surface)?;
    let physical = surface.size();
    debug!(
        width = physical.width,
        height = physical.height,
        "allocated surface"
    );
    surface.clear();

    if surface.supports_smoothing_quality() {
        surface.set_smoothing_quality(SmoothingQuality::High);
    }

    if options.rotation != Rotation::Deg0 {
        surface.rotate(options.rotation.radians());
        let (dx, dy) = plan.offset;
        surface.translate(dx, dy);
    }

    surface.draw_image(image, plan.solved);
    surface.to_data_url(options.format, options.quality.as_fraction())
}
