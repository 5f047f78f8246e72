//! Second-derivative operators.

use crate::image::Raster;
use crate::kernel::{correlate_fixed, map_interior};
use crate::util::math::clamp_i32_to_u8;

/// 5x5 integer approximation of the Laplacian of Gaussian.
const LOG_5X5: [[i32; 5]; 5] = [
    [0, 0, -1, 0, 0],
    [0, -1, -2, -1, 0],
    [-1, -2, 16, -2, -1],
    [0, -1, -2, -1, 0],
    [0, 0, -1, 0, 0],
];

/// 4-neighbour discrete Laplacian.
const LAPLACIAN_3X3: [[i32; 3]; 3] = [[0, 1, 0], [1, -4, 1], [0, 1, 0]];

/// Absolute LoG response; a two-pixel border stays 0.
pub fn log(raster: &Raster) -> Raster {
    let src = raster.data();
    let width = raster.width();
    map_interior(raster, 2, |x, y| {
        clamp_i32_to_u8(correlate_fixed(src, width, x, y, &LOG_5X5).abs())
    })
}

/// Absolute 3x3 Laplacian response; a one-pixel border stays 0.
pub fn laplacian(raster: &Raster) -> Raster {
    let src = raster.data();
    let width = raster.width();
    map_interior(raster, 1, |x, y| {
        clamp_i32_to_u8(correlate_fixed(src, width, x, y, &LAPLACIAN_3X3).abs())
    })
}

#[cfg(test)]
mod tests {
    use super::{laplacian, log};
    use crate::image::Raster;

    #[test]
    fn log_responds_to_isolated_dot() {
        let raster = Raster::from_fn(7, 7, |x, y| if (x, y) == (3, 3) { 10 } else { 0 }).unwrap();
        let out = log(&raster);
        assert_eq!(out.get(3, 3), Some(160));
        // Negative lobe is rectified.
        assert_eq!(out.get(3, 2), Some(20));
        assert_eq!(out.get(1, 1), Some(0));
    }

    #[test]
    fn laplacian_of_ramp_is_zero() {
        let raster = Raster::from_fn(6, 6, |x, _| (x * 20) as u8).unwrap();
        assert!(laplacian(&raster).data().iter().all(|&v| v == 0));
    }
}
