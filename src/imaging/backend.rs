//! Rendering surface capability and shared types.
//!
//! A render needs a 2D drawing surface that can be created at a given size,
//! cleared, transformed, drawn into and serialized to a data URI. The
//! [`SurfaceBackend`] trait creates surfaces, [`RenderSurface`] is the surface
//! itself. Everything above this module talks to those two traits only, so a
//! software rasterizer, a native bitmap library or a mock can sit behind them.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::CompressFormat;
use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Rendering surface unavailable ({width}x{height}): {reason}")]
    SurfaceUnavailable {
        width: u32,
        height: u32,
        reason: String,
    },
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(image: &DynamicImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

/// Interpolation requested when the drawn size differs from the source size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmoothingQuality {
    #[default]
    Low,
    Medium,
    High,
}

/// 2D affine transform in canvas convention.
///
/// Maps `(x, y)` to `(a·x + c·y + e, b·x + d·y + f)`. [`rotate`](Self::rotate)
/// and [`translate`](Self::translate) post-multiply, so the last call applies
/// to user coordinates first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Rotate clockwise (y axis pointing down) by `radians`.
    pub fn rotate(&mut self, radians: f64) {
        let (sin, cos) = radians.sin_cos();
        let Self { a, b, c, d, .. } = *self;
        self.a = a * cos + c * sin;
        self.b = b * cos + d * sin;
        self.c = c * cos - a * sin;
        self.d = d * cos - b * sin;
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.e += self.a * dx + self.c * dy;
        self.f += self.b * dx + self.d * dy;
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// `None` for degenerate (non-invertible) transforms.
    pub fn invert(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f64::EPSILON {
            return None;
        }
        Some(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }
}

/// A 2D drawing surface owned by a single render.
pub trait RenderSurface {
    /// Allocated (physical) size.
    fn size(&self) -> Dimensions;

    /// Reset every pixel to fully transparent.
    fn clear(&mut self);

    /// Whether [`set_smoothing_quality`](Self::set_smoothing_quality) has any effect.
    fn supports_smoothing_quality(&self) -> bool {
        false
    }

    fn set_smoothing_quality(&mut self, _quality: SmoothingQuality) {}

    /// Rotate the coordinate system clockwise.
    fn rotate(&mut self, radians: f64);

    /// Move the origin of the coordinate system.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Draw `image` scaled to `size` at the origin of the current coordinate system.
    fn draw_image(&mut self, image: &DynamicImage, size: Dimensions);

    /// Encode the surface and wrap it as `data:<mime>;base64,<payload>`.
    ///
    /// `quality` is a `0.0..=1.0` fraction; lossless formats ignore it.
    fn to_data_url(&self, format: CompressFormat, quality: f32) -> Result<String, BackendError>;
}

/// Factory for rendering surfaces.
pub trait SurfaceBackend: Sync {
    type Surface: RenderSurface;

    /// Allocate a transparent surface. Fails with
    /// [`BackendError::SurfaceUnavailable`] when no surface can be had.
    fn create_surface(&self, size: Dimensions) -> Result<Self::Surface, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use std::sync::{Arc, Mutex};

    /// Mock backend that records surface operations without touching pixels.
    ///
    /// Serializing a mock surface yields a real data URI whose payload is the
    /// ASCII text `"<width>x<height>"`, so packing can be checked downstream.
    #[derive(Default)]
    pub struct MockBackend {
        pub operations: Arc<Mutex<Vec<RecordedOp>>>,
        pub unavailable: bool,
        pub smoothing_supported: bool,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Create { width: u32, height: u32 },
        Clear,
        Smoothing(SmoothingQuality),
        Rotate { degrees: i64 },
        Translate { dx: f64, dy: f64 },
        Draw {
            source: (u32, u32),
            width: u32,
            height: u32,
        },
        Encode { format: CompressFormat, quality: f32 },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn unavailable() -> Self {
            Self {
                unavailable: true,
                ..Self::default()
            }
        }

        pub fn with_smoothing() -> Self {
            Self {
                smoothing_supported: true,
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    pub struct MockSurface {
        size: Dimensions,
        smoothing_supported: bool,
        operations: Arc<Mutex<Vec<RecordedOp>>>,
    }

    impl MockSurface {
        fn record(&self, op: RecordedOp) {
            self.operations.lock().unwrap().push(op);
        }
    }

    impl RenderSurface for MockSurface {
        fn size(&self) -> Dimensions {
            self.size
        }

        fn clear(&mut self) {
            self.record(RecordedOp::Clear);
        }

        fn supports_smoothing_quality(&self) -> bool {
            self.smoothing_supported
        }

        fn set_smoothing_quality(&mut self, quality: SmoothingQuality) {
            self.record(RecordedOp::Smoothing(quality));
        }

        fn rotate(&mut self, radians: f64) {
            self.record(RecordedOp::Rotate {
                degrees: radians.to_degrees().round() as i64,
            });
        }

        fn translate(&mut self, dx: f64, dy: f64) {
            self.record(RecordedOp::Translate { dx, dy });
        }

        fn draw_image(&mut self, image: &DynamicImage, size: Dimensions) {
            self.record(RecordedOp::Draw {
                source: (image.width(), image.height()),
                width: size.width,
                height: size.height,
            });
        }

        fn to_data_url(
            &self,
            format: CompressFormat,
            quality: f32,
        ) -> Result<String, BackendError> {
            self.record(RecordedOp::Encode { format, quality });
            let payload = format!("{}x{}", self.size.width, self.size.height);
            Ok(format!(
                "data:{};base64,{}",
                format.mime_type(),
                STANDARD.encode(payload)
            ))
        }
    }

    impl SurfaceBackend for MockBackend {
        type Surface = MockSurface;

        fn create_surface(&self, size: Dimensions) -> Result<MockSurface, BackendError> {
            if self.unavailable {
                return Err(BackendError::SurfaceUnavailable {
                    width: size.width,
                    height: size.height,
                    reason: "mock surface disabled".to_string(),
                });
            }
            self.operations.lock().unwrap().push(RecordedOp::Create {
                width: size.width,
                height: size.height,
            });
            Ok(MockSurface {
                size,
                smoothing_supported: self.smoothing_supported,
                operations: Arc::clone(&self.operations),
            })
        }
    }

    #[test]
    fn mock_records_create_and_draw() {
        let backend = MockBackend::new();
        let mut surface = backend
            .create_surface(Dimensions {
                width: 20,
                height: 10,
            })
            .unwrap();
        surface.draw_image(
            &DynamicImage::new_rgba8(4, 2),
            Dimensions {
                width: 20,
                height: 10,
            },
        );

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 2);
        assert_eq!(
            ops[0],
            RecordedOp::Create {
                width: 20,
                height: 10
            }
        );
        assert!(matches!(
            &ops[1],
            RecordedOp::Draw {
                source: (4, 2),
                width: 20,
                height: 10
            }
        ));
    }

    #[test]
    fn mock_unavailable_fails_create() {
        let backend = MockBackend::unavailable();
        let result = backend.create_surface(Dimensions {
            width: 1,
            height: 1,
        });
        assert!(matches!(
            result,
            Err(BackendError::SurfaceUnavailable { .. })
        ));
        assert!(backend.get_operations().is_empty());
    }

    // =========================================================================
    // Transform2D tests
    // =========================================================================

    fn assert_point(actual: (f64, f64), expected: (f64, f64)) {
        assert!(
            (actual.0 - expected.0).abs() < 1e-9 && (actual.1 - expected.1).abs() < 1e-9,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn identity_maps_points_unchanged() {
        assert_point(Transform2D::IDENTITY.apply(3.0, 4.0), (3.0, 4.0));
    }

    #[test]
    fn quarter_turn_then_translate_lands_in_canvas() {
        // Drawing 300x200 rotated 90° onto a 200x300 canvas
        let mut t = Transform2D::IDENTITY;
        t.rotate(std::f64::consts::FRAC_PI_2);
        t.translate(0.0, -200.0);
        assert_point(t.apply(0.0, 0.0), (200.0, 0.0));
        assert_point(t.apply(300.0, 200.0), (0.0, 300.0));
    }

    #[test]
    fn half_turn_then_translate_lands_in_canvas() {
        let mut t = Transform2D::IDENTITY;
        t.rotate(std::f64::consts::PI);
        t.translate(-300.0, -200.0);
        assert_point(t.apply(0.0, 0.0), (300.0, 200.0));
        assert_point(t.apply(300.0, 200.0), (0.0, 0.0));
    }

    #[test]
    fn invert_round_trips() {
        let mut t = Transform2D::IDENTITY;
        t.rotate(3.0 * std::f64::consts::FRAC_PI_2);
        t.translate(-300.0, 0.0);
        let inv = t.invert().unwrap();
        let (x, y) = t.apply(12.5, 40.25);
        assert_point(inv.apply(x, y), (12.5, 40.25));
    }

    #[test]
    fn degenerate_transform_has_no_inverse() {
        let t = Transform2D {
            a: 0.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            e: 1.0,
            f: 1.0,
        };
        assert!(t.invert().is_none());
    }
}
