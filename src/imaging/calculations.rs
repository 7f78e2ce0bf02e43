//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;
use super::params::{Constraints, Rotation};

/// `value * numerator / denominator`, rounded half away from zero.
fn scale(value: u32, numerator: u32, denominator: u32) -> u32 {
    (value as f64 * numerator as f64 / denominator as f64).round() as u32
}

/// Fit `(height, width)` into the constraint box, preserving aspect ratio.
///
/// Width and height are clamped independently, and both clamps compute their
/// ratio from the *original* arguments. When both fire, the height clamp runs
/// second and overwrites the width chosen by the width clamp, so height
/// constraints win. A `min_width`/`min_height` of zero is treated as unset.
///
/// If min and max coincide on both axes the box is an exact size and the
/// aspect ratio is ignored.
///
/// # Examples
/// ```
/// # use image_file_resizer::imaging::{Constraints, solve_dimensions};
/// // Width clamp gives 100x50, then the height clamp (200 > 100) wins: 200x100
/// let dims = solve_dimensions(200, 400, &Constraints::max(100, 100));
/// assert_eq!((dims.width, dims.height), (200, 100));
/// ```
pub fn solve_dimensions(height: u32, width: u32, constraints: &Constraints) -> Dimensions {
    let Constraints {
        max_width,
        max_height,
        min_width,
        min_height,
    } = *constraints;

    if min_height == Some(max_height) && min_width == Some(max_width) {
        return Dimensions {
            width: max_width,
            height: max_height,
        };
    }

    let min_width = min_width.filter(|&m| m != 0);
    let min_height = min_height.filter(|&m| m != 0);

    let mut out = Dimensions { width, height };

    if width > max_width {
        out.height = scale(height, max_width, width);
        out.width = max_width;
    } else if let Some(min_width) = min_width.filter(|&m| width < m) {
        out.height = scale(height, min_width, width);
        out.width = min_width;
    }

    if height > max_height {
        out.width = scale(width, max_height, height);
        out.height = max_height;
    } else if let Some(min_height) = min_height.filter(|&m| height < m) {
        out.width = scale(width, min_height, height);
        out.height = min_height;
    }

    out
}

/// Allocated canvas size for a render: the solved size, axes swapped for
/// quarter turns.
pub fn physical_surface_size(solved: Dimensions, rotation: Rotation) -> Dimensions {
    if rotation.swaps_axes() {
        Dimensions {
            width: solved.height,
            height: solved.width,
        }
    } else {
        solved
    }
}

/// Translation applied after rotating, so the rotated drawing lands back
/// inside a canvas of `physical` size.
///
/// # Returns
/// * `(dx, dy)` in the rotated coordinate space
pub fn rotation_offset(rotation: Rotation, physical: Dimensions) -> (f64, f64) {
    let w = physical.width as f64;
    let h = physical.height as f64;
    match rotation {
        Rotation::Deg0 => (0.0, 0.0),
        Rotation::Deg90 => (0.0, -w),
        Rotation::Deg180 => (-w, -h),
        Rotation::Deg270 => (-h, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    // =========================================================================
    // solve_dimensions tests
    // =========================================================================

    #[test]
    fn exact_box_ignores_aspect_ratio() {
        let c = Constraints::exact(300, 200);
        assert_eq!(solve_dimensions(1000, 10, &c), dims(300, 200));
        assert_eq!(solve_dimensions(10, 1000, &c), dims(300, 200));
        assert_eq!(solve_dimensions(200, 300, &c), dims(300, 200));
    }

    #[test]
    fn exact_box_needs_both_axes() {
        // Only width collapses: normal clamping applies
        let c = Constraints {
            max_width: 300,
            max_height: 200,
            min_width: Some(300),
            min_height: None,
        };
        assert_eq!(solve_dimensions(100, 150, &c), dims(300, 200));
    }

    #[test]
    fn width_down_clamp() {
        // 800x300 into 400x400: height = round(300 * 400 / 800) = 150
        let c = Constraints::max(400, 400);
        assert_eq!(solve_dimensions(300, 800, &c), dims(400, 150));
    }

    #[test]
    fn width_down_clamp_rounds() {
        // 1000x333 into 300 wide: 333 * 300 / 1000 = 99.9 → 100
        let c = Constraints::max(300, 1000);
        assert_eq!(solve_dimensions(333, 1000, &c), dims(300, 100));
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // 5 * 100 / 200 = 2.5 → 3
        let c = Constraints::max(100, 1000);
        assert_eq!(solve_dimensions(5, 200, &c), dims(100, 3));
    }

    #[test]
    fn width_up_clamp() {
        // 100x50 with min width 200: height = round(50 * 200 / 100) = 100
        let c = Constraints::max(1000, 1000).with_min(200, 0);
        assert_eq!(solve_dimensions(50, 100, &c), dims(200, 100));
    }

    #[test]
    fn height_down_clamp() {
        // 300x900 into 1000x450: width = round(300 * 450 / 900) = 150
        let c = Constraints::max(1000, 450);
        assert_eq!(solve_dimensions(900, 300, &c), dims(150, 450));
    }

    #[test]
    fn height_up_clamp() {
        // 80x40 with min height 100: width = round(80 * 100 / 40) = 200
        let c = Constraints::max(1000, 1000).with_min(0, 100);
        assert_eq!(solve_dimensions(40, 80, &c), dims(200, 100));
    }

    #[test]
    fn height_clamp_overrides_width_clamp() {
        // Width clamp → 100x50, then height 200 > 100 recomputes from the
        // original ratio: width = round(400 * 100 / 200) = 200
        let c = Constraints::max(100, 100);
        assert_eq!(solve_dimensions(200, 400, &c), dims(200, 100));
    }

    #[test]
    fn height_up_clamp_overrides_width_down_clamp() {
        // 2000x100: width clamp → 500x25, then height 100 < 150 → width 3000
        let c = Constraints::max(500, 1000).with_min(0, 150);
        assert_eq!(solve_dimensions(100, 2000, &c), dims(3000, 150));
    }

    #[test]
    fn zero_minimum_is_unset() {
        let c = Constraints::max(1000, 1000).with_min(0, 0);
        assert_eq!(solve_dimensions(10, 20, &c), dims(20, 10));
    }

    #[test]
    fn unset_minimums_never_form_exact_box() {
        let c = Constraints::max(100, 100);
        assert_eq!(solve_dimensions(50, 60, &c), dims(60, 50));
    }

    #[test]
    fn within_box_is_unchanged() {
        let c = Constraints::max(800, 600).with_min(100, 100);
        for (h, w) in [(100, 100), (600, 800), (333, 517), (599, 101)] {
            assert_eq!(solve_dimensions(h, w, &c), dims(w, h));
        }
    }

    #[test]
    fn width_clamp_keeps_height_when_within_bounds() {
        let c = Constraints::max(640, 10_000);
        for (h, w) in [(480, 1280), (1, 641), (9999, 5000)] {
            let out = solve_dimensions(h, w, &c);
            assert_eq!(out.width, 640);
            assert_eq!(out.height, (h as f64 * 640.0 / w as f64).round() as u32);
        }
    }

    // =========================================================================
    // surface geometry tests
    // =========================================================================

    #[test]
    fn quarter_turns_swap_physical_size() {
        let solved = dims(300, 200);
        assert_eq!(physical_surface_size(solved, Rotation::Deg90), dims(200, 300));
        assert_eq!(physical_surface_size(solved, Rotation::Deg270), dims(200, 300));
    }

    #[test]
    fn half_turns_keep_physical_size() {
        let solved = dims(300, 200);
        assert_eq!(physical_surface_size(solved, Rotation::Deg0), solved);
        assert_eq!(physical_surface_size(solved, Rotation::Deg180), solved);
    }

    #[test]
    fn offsets_per_rotation() {
        let physical = dims(200, 300);
        assert_eq!(rotation_offset(Rotation::Deg0, physical), (0.0, 0.0));
        assert_eq!(rotation_offset(Rotation::Deg90, physical), (0.0, -200.0));
        assert_eq!(rotation_offset(Rotation::Deg180, physical), (-200.0, -300.0));
        assert_eq!(rotation_offset(Rotation::Deg270, physical), (-300.0, 0.0));
    }
}
