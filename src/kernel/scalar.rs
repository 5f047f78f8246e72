//! Scalar reference implementation of the convolution engine.

use crate::image::Raster;
use crate::kernel::{Kernel1d, Kernel2d};
use crate::util::math::{clamp_coord, clamp_to_u8};

/// Raw clamp-to-edge response of `kernel` centred on `(x, y)`.
#[inline]
pub(crate) fn correlate_at(
    src: &[u8],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    kernel: &Kernel2d,
) -> f64 {
    let rx = (kernel.width() / 2) as isize;
    let ry = (kernel.height() / 2) as isize;
    let mut weights = kernel.weights().iter();
    let mut sum = 0.0f64;
    for dy in -ry..=ry {
        let sy = clamp_coord(y as isize + dy, height);
        let row = &src[sy * width..(sy + 1) * width];
        for dx in -rx..=rx {
            let sx = clamp_coord(x as isize + dx, width);
            if let Some(&w) = weights.next() {
                sum += f64::from(row[sx]) * w;
            }
        }
    }
    sum
}

/// Writes row `y` of the horizontal pass into `out`.
#[inline]
pub(crate) fn horizontal_row(src: &[u8], width: usize, y: usize, kernel: &Kernel1d, out: &mut [u8]) {
    let r = kernel.radius() as isize;
    let row = &src[y * width..(y + 1) * width];
    for (x, dst) in out.iter_mut().enumerate() {
        let mut sum = 0.0f64;
        for (k, &w) in (-r..=r).zip(kernel.weights()) {
            let px = clamp_coord(x as isize + k, width);
            sum += f64::from(row[px]) * w;
        }
        *dst = clamp_to_u8(sum);
    }
}

/// Writes row `y` of the vertical pass over `src` into `out`.
#[inline]
pub(crate) fn vertical_row(
    src: &[u8],
    width: usize,
    height: usize,
    y: usize,
    kernel: &Kernel1d,
    out: &mut [u8],
) {
    let r = kernel.radius() as isize;
    for (x, dst) in out.iter_mut().enumerate() {
        let mut sum = 0.0f64;
        for (k, &w) in (-r..=r).zip(kernel.weights()) {
            let py = clamp_coord(y as isize + k, height);
            sum += f64::from(src[py * width + x]) * w;
        }
        *dst = clamp_to_u8(sum);
    }
}

/// Full clamp-to-edge 2D convolution.
pub fn convolve(raster: &Raster, kernel: &Kernel2d) -> Raster {
    let (width, height) = raster.dimensions();
    let src = raster.data();
    let mut out = vec![0u8; width * height];
    for (y, row) in out.chunks_exact_mut(width).enumerate() {
        for (x, dst) in row.iter_mut().enumerate() {
            *dst = clamp_to_u8(correlate_at(src, width, height, x, y, kernel));
        }
    }
    Raster::from_parts(out, width, height)
}

/// Unclamped clamp-to-edge 2D response, one `f64` per pixel.
pub fn correlate(raster: &Raster, kernel: &Kernel2d) -> Vec<f64> {
    let (width, height) = raster.dimensions();
    let src = raster.data();
    let mut out = vec![0.0f64; width * height];
    for (y, row) in out.chunks_exact_mut(width).enumerate() {
        for (x, dst) in row.iter_mut().enumerate() {
            *dst = correlate_at(src, width, height, x, y, kernel);
        }
    }
    out
}

/// Separable convolution: horizontal pass, then vertical pass.
///
/// The intermediate image is quantized to `u8` between passes.
pub fn convolve_separable(raster: &Raster, kernel: &Kernel1d) -> Raster {
    let (width, height) = raster.dimensions();
    let src = raster.data();
    let mut tmp = vec![0u8; width * height];
    for (y, row) in tmp.chunks_exact_mut(width).enumerate() {
        horizontal_row(src, width, y, kernel, row);
    }
    let mut out = vec![0u8; width * height];
    for (y, row) in out.chunks_exact_mut(width).enumerate() {
        vertical_row(&tmp, width, height, y, kernel, row);
    }
    Raster::from_parts(out, width, height)
}
