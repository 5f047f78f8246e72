//! Rayon-parallel convolution (feature-gated).
//!
//! Rows are distributed across threads; each thread owns a disjoint output
//! row, so results are bit-identical to the scalar versions.

use crate::image::Raster;
use crate::kernel::scalar::{correlate_at, horizontal_row, vertical_row};
use crate::kernel::{Kernel1d, Kernel2d};
use crate::util::math::clamp_to_u8;
use rayon::prelude::*;

/// Row-parallel clamp-to-edge 2D convolution.
pub fn convolve_par(raster: &Raster, kernel: &Kernel2d) -> Raster {
    let (width, height) = raster.dimensions();
    let src = raster.data();
    let mut out = vec![0u8; width * height];
    out.par_chunks_exact_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, dst) in row.iter_mut().enumerate() {
                *dst = clamp_to_u8(correlate_at(src, width, height, x, y, kernel));
            }
        });
    Raster::from_parts(out, width, height)
}

/// Row-parallel unclamped 2D response, one `f64` per pixel.
pub fn correlate_par(raster: &Raster, kernel: &Kernel2d) -> Vec<f64> {
    let (width, height) = raster.dimensions();
    let src = raster.data();
    let mut out = vec![0.0f64; width * height];
    out.par_chunks_exact_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, dst) in row.iter_mut().enumerate() {
                *dst = correlate_at(src, width, height, x, y, kernel);
            }
        });
    out
}

/// Row-parallel separable convolution (horizontal, then vertical).
pub fn convolve_separable_par(raster: &Raster, kernel: &Kernel1d) -> Raster {
    let (width, height) = raster.dimensions();
    let src = raster.data();
    let mut tmp = vec![0u8; width * height];
    tmp.par_chunks_exact_mut(width)
        .enumerate()
        .for_each(|(y, row)| horizontal_row(src, width, y, kernel, row));
    let mut out = vec![0u8; width * height];
    out.par_chunks_exact_mut(width)
        .enumerate()
        .for_each(|(y, row)| vertical_row(&tmp, width, height, y, kernel, row));
    Raster::from_parts(out, width, height)
}
