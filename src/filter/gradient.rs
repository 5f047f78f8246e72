//! First-derivative operators: Sobel, Prewitt, Scharr, Roberts and Kirsch.
//!
//! The 3x3 operators are evaluated only where the full window fits, so the
//! outermost row and column on each side stay 0.

use crate::image::Raster;
use crate::kernel::{correlate_fixed, map_interior};
use crate::util::math::{clamp_i32_to_u8, magnitude_u8};

const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

const PREWITT_X: [[i32; 3]; 3] = [[-1, 0, 1], [-1, 0, 1], [-1, 0, 1]];
const PREWITT_Y: [[i32; 3]; 3] = [[-1, -1, -1], [0, 0, 0], [1, 1, 1]];

const SCHARR_X: [[i32; 3]; 3] = [[3, 0, -3], [10, 0, -10], [3, 0, -3]];
const SCHARR_Y: [[i32; 3]; 3] = [[3, 10, 3], [0, 0, 0], [-3, -10, -3]];

/// Compass kernels, starting north and rotating clockwise.
const KIRSCH: [[[i32; 3]; 3]; 8] = [
    [[5, 5, 5], [-3, 0, -3], [-3, -3, -3]],
    [[-3, 5, 5], [-3, 0, 5], [-3, -3, -3]],
    [[-3, -3, 5], [-3, 0, 5], [-3, -3, 5]],
    [[-3, -3, -3], [-3, 0, 5], [-3, 5, 5]],
    [[-3, -3, -3], [-3, 0, -3], [5, 5, 5]],
    [[-3, -3, -3], [5, 0, -3], [5, 5, -3]],
    [[5, -3, -3], [5, 0, -3], [5, -3, -3]],
    [[5, 5, -3], [5, 0, -3], [-3, -3, -3]],
];

fn gradient_magnitude(raster: &Raster, kx: &[[i32; 3]; 3], ky: &[[i32; 3]; 3]) -> Raster {
    let src = raster.data();
    let width = raster.width();
    map_interior(raster, 1, |x, y| {
        let gx = correlate_fixed(src, width, x, y, kx);
        let gy = correlate_fixed(src, width, x, y, ky);
        magnitude_u8(gx, gy)
    })
}

/// Sobel gradient magnitude.
pub fn sobel(raster: &Raster) -> Raster {
    gradient_magnitude(raster, &SOBEL_X, &SOBEL_Y)
}

/// Prewitt gradient magnitude.
pub fn prewitt(raster: &Raster) -> Raster {
    gradient_magnitude(raster, &PREWITT_X, &PREWITT_Y)
}

/// Scharr gradient magnitude.
pub fn scharr(raster: &Raster) -> Raster {
    gradient_magnitude(raster, &SCHARR_X, &SCHARR_Y)
}

/// Roberts cross on the 2x2 window anchored at each pixel's top-left.
///
/// The last row and column have no complete window and stay 0.
pub fn roberts(raster: &Raster) -> Raster {
    let (width, height) = raster.dimensions();
    let src = raster.data();
    let mut out = vec![0u8; width * height];
    for y in 0..height.saturating_sub(1) {
        for x in 0..width.saturating_sub(1) {
            let idx = y * width + x;
            let gx = i32::from(src[idx]) - i32::from(src[idx + width + 1]);
            let gy = i32::from(src[idx + 1]) - i32::from(src[idx + width]);
            out[idx] = magnitude_u8(gx, gy);
        }
    }
    Raster::from_parts(out, width, height)
}

/// Maximum absolute response over the eight Kirsch compass kernels.
pub fn kirsch(raster: &Raster) -> Raster {
    let src = raster.data();
    let width = raster.width();
    map_interior(raster, 1, |x, y| {
        let strongest = KIRSCH
            .iter()
            .map(|kernel| correlate_fixed(src, width, x, y, kernel).abs())
            .max()
            .unwrap_or(0);
        clamp_i32_to_u8(strongest)
    })
}

#[cfg(test)]
mod tests {
    use super::{kirsch, roberts, sobel};
    use crate::image::Raster;

    #[test]
    fn sobel_leaves_border_zero() {
        let raster = Raster::from_fn(6, 5, |x, y| ((x * 53 + y * 29) % 256) as u8).unwrap();
        let out = sobel(&raster);
        for x in 0..6 {
            assert_eq!(out.get(x, 0), Some(0));
            assert_eq!(out.get(x, 4), Some(0));
        }
        for y in 0..5 {
            assert_eq!(out.get(0, y), Some(0));
            assert_eq!(out.get(5, y), Some(0));
        }
    }

    #[test]
    fn roberts_reports_diagonal_difference() {
        let raster = Raster::new(vec![100, 0, 0, 40], 2, 2).unwrap();
        let out = roberts(&raster);
        // gx = 100 - 40, gy = 0 - 0.
        assert_eq!(out.data(), &[60, 0, 0, 0]);
    }

    #[test]
    fn kirsch_saturates_on_strong_edge() {
        let raster = Raster::from_fn(5, 5, |x, _| if x < 2 { 0 } else { 200 }).unwrap();
        let out = kirsch(&raster);
        assert_eq!(out.get(2, 2), Some(255));
        assert_eq!(out.get(0, 2), Some(0));
    }

    #[test]
    fn tiny_rasters_produce_zeros() {
        let raster = Raster::filled(2, 1, 9).unwrap();
        assert_eq!(sobel(&raster).data(), &[0, 0]);
        assert_eq!(kirsch(&raster).data(), &[0, 0]);
    }
}
