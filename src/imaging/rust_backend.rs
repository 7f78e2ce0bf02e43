//! Software rendering surface built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Surface storage | `image::RgbaImage` |
//! | Scaling | `image::imageops::resize` (filter chosen by smoothing quality) |
//! | Rotation / translation | [`Transform2D`] inverse mapping, pixel-center sampling |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (flattened onto black) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Encode → WebP | `webp::Encoder` (lossy, libwebp quality scale) |
//! | Envelope | `base64` standard alphabet |

use super::backend::{
    BackendError, Dimensions, RenderSurface, SmoothingQuality, SurfaceBackend, Transform2D,
};
use super::params::CompressFormat;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

/// Largest surface a browser canvas will hand out (16384 × 16384).
pub const DEFAULT_MAX_PIXELS: u64 = 16_384 * 16_384;

/// Pure Rust surface factory.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend {
    max_pixels: u64,
}

impl RustBackend {
    pub fn new() -> Self {
        Self {
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }

    /// Refuse surfaces with more than `max_pixels` pixels.
    pub fn with_max_pixels(max_pixels: u64) -> Self {
        Self { max_pixels }
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceBackend for RustBackend {
    type Surface = RasterSurface;

    fn create_surface(&self, size: Dimensions) -> Result<RasterSurface, BackendError> {
        let unavailable = |reason: String| BackendError::SurfaceUnavailable {
            width: size.width,
            height: size.height,
            reason,
        };
        if size.width == 0 || size.height == 0 {
            return Err(unavailable("zero-sized surface".to_string()));
        }
        let pixels = size.width as u64 * size.height as u64;
        if pixels > self.max_pixels {
            return Err(unavailable(format!(
                "{pixels} pixels exceeds the {} pixel limit",
                self.max_pixels
            )));
        }
        Ok(RasterSurface {
            canvas: RgbaImage::new(size.width, size.height),
            transform: Transform2D::IDENTITY,
            smoothing: SmoothingQuality::default(),
        })
    }
}

/// An RGBA canvas with a current transform.
pub struct RasterSurface {
    canvas: RgbaImage,
    transform: Transform2D,
    smoothing: SmoothingQuality,
}

#[cfg(test)]
impl RasterSurface {
    pub fn pixels(&self) -> &RgbaImage {
        &self.canvas
    }
}

fn filter_for(smoothing: SmoothingQuality) -> FilterType {
    match smoothing {
        SmoothingQuality::Low => FilterType::Triangle,
        SmoothingQuality::Medium => FilterType::CatmullRom,
        SmoothingQuality::High => FilterType::Lanczos3,
    }
}

/// Composite the canvas onto opaque black, as JPEG has no alpha channel.
fn flatten_onto_black(canvas: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        let Rgba([r, g, b, a]) = *canvas.get_pixel(x, y);
        let scale = |c: u8| ((c as u32 * a as u32 + 127) / 255) as u8;
        Rgb([scale(r), scale(g), scale(b)])
    })
}

/// Source-over compositing of `src` onto `dst`.
fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = src[3] as f32 / 255.0;
    if sa >= 1.0 {
        *dst = src;
        return;
    }
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for i in 0..3 {
        let c = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        dst[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

impl RenderSurface for RasterSurface {
    fn size(&self) -> Dimensions {
        Dimensions {
            width: self.canvas.width(),
            height: self.canvas.height(),
        }
    }

    fn clear(&mut self) {
        for pixel in self.canvas.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    fn supports_smoothing_quality(&self) -> bool {
        true
    }

    fn set_smoothing_quality(&mut self, quality: SmoothingQuality) {
        self.smoothing = quality;
    }

    fn rotate(&mut self, radians: f64) {
        self.transform.rotate(radians);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform.translate(dx, dy);
    }

    fn draw_image(&mut self, image: &DynamicImage, size: Dimensions) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        let Some(inverse) = self.transform.invert() else {
            return;
        };

        let scaled = if Dimensions::of(image) == size {
            image.to_rgba8()
        } else {
            image::imageops::resize(image, size.width, size.height, filter_for(self.smoothing))
        };

        let (w, h) = (size.width as f64, size.height as f64);
        for (x, y, pixel) in self.canvas.enumerate_pixels_mut() {
            // Sample at the pixel center to stay clear of edges after rotation
            let (u, v) = inverse.apply(x as f64 + 0.5, y as f64 + 0.5);
            if u < 0.0 || v < 0.0 || u >= w || v >= h {
                continue;
            }
            blend_over(pixel, *scaled.get_pixel(u as u32, v as u32));
        }
    }

    fn to_data_url(&self, format: CompressFormat, quality: f32) -> Result<String, BackendError> {
        let mut bytes: Vec<u8> = Vec::new();
        match format {
            CompressFormat::Jpeg => {
                let q = (quality * 100.0).round().clamp(1.0, 100.0) as u8;
                let encoder = JpegEncoder::new_with_quality(&mut bytes, q);
                flatten_onto_black(&self.canvas)
                    .write_with_encoder(encoder)
                    .map_err(|e| BackendError::Encode(format!("JPEG encode failed: {e}")))?;
            }
            CompressFormat::Png => {
                let encoder = PngEncoder::new(&mut bytes);
                self.canvas
                    .write_with_encoder(encoder)
                    .map_err(|e| BackendError::Encode(format!("PNG encode failed: {e}")))?;
            }
            CompressFormat::Webp => {
                let (width, height) = self.canvas.dimensions();
                let encoder = webp::Encoder::from_rgba(self.canvas.as_raw(), width, height);
                let q = (quality * 100.0).clamp(0.0, 100.0);
                bytes.extend_from_slice(&encoder.encode(q));
            }
        }
        Ok(format!(
            "data:{};base64,{}",
            format.mime_type(),
            STANDARD.encode(&bytes)
        ))
    }
}
