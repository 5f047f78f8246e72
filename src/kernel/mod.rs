//! Convolution kernels and the clamp-to-edge convolution engine.
//!
//! All kernels are applied correlation-style (the kernel is not flipped),
//! with the anchor at the kernel centre. Floating-point kernels sample
//! out-of-bounds pixels by clamping the coordinate into the raster
//! (clamp-to-edge); fixed integer kernels are only evaluated where the whole
//! window is inside the raster and leave a zero border. Accumulation runs in
//! `f64` (or `i32` for integer kernels) and every written pixel is clamped to
//! `[0, 255]` and truncated.

use crate::image::Raster;
use crate::util::math::{gaussian_radius, require_sigma};

pub use crate::util::math::MAX_SIGMA;
use crate::util::{EdgeSketchError, EdgeSketchResult};

pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;

/// Odd-length 1D kernel for separable convolution.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel1d {
    weights: Vec<f64>,
    radius: usize,
}

impl Kernel1d {
    /// Wraps `weights`, whose length must be `2 * radius + 1`.
    pub fn new(weights: Vec<f64>) -> EdgeSketchResult<Self> {
        if weights.len() % 2 == 0 {
            return Err(EdgeSketchError::InvalidInput(
                "1D kernel length must be odd",
            ));
        }
        let radius = weights.len() / 2;
        Ok(Self { weights, radius })
    }

    /// Normalized Gaussian `exp(-0.5 i^2 / sigma^2)` with radius `ceil(3 sigma)`.
    ///
    /// `sigma == 0`, or a sigma so small that its square underflows, yields
    /// the identity kernel `[1.0]`. Sigmas above [`MAX_SIGMA`] are rejected.
    pub fn gaussian(sigma: f64) -> EdgeSketchResult<Self> {
        require_sigma("sigma", sigma)?;
        if sigma * sigma == 0.0 {
            return Self::new(vec![1.0]);
        }
        let radius = gaussian_radius(sigma) as isize;
        let mut weights: Vec<f64> = (-radius..=radius)
            .map(|i| (-0.5 * (i * i) as f64 / (sigma * sigma)).exp())
            .collect();
        let sum: f64 = weights.iter().sum();
        for w in weights.iter_mut() {
            *w /= sum;
        }
        Self::new(weights)
    }

    /// Returns the kernel radius.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Returns the kernel weights, index `radius` being the centre tap.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

/// Row-major 2D kernel with odd width and height.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel2d {
    weights: Vec<f64>,
    width: usize,
    height: usize,
}

impl Kernel2d {
    /// Wraps row-major `weights` of size `width x height` (both odd).
    pub fn new(weights: Vec<f64>, width: usize, height: usize) -> EdgeSketchResult<Self> {
        if width % 2 == 0 || height % 2 == 0 {
            return Err(EdgeSketchError::InvalidDimensions { width, height });
        }
        if weights.len() != width * height {
            return Err(EdgeSketchError::BufferLengthMismatch {
                expected: width * height,
                got: weights.len(),
            });
        }
        Ok(Self {
            weights,
            width,
            height,
        })
    }

    /// Builds a square kernel of the given radius from `f(dx, dy)`.
    pub fn from_fn<F>(radius: usize, mut f: F) -> Self
    where
        F: FnMut(isize, isize) -> f64,
    {
        let r = radius as isize;
        let side = 2 * radius + 1;
        let mut weights = Vec::with_capacity(side * side);
        for dy in -r..=r {
            for dx in -r..=r {
                weights.push(f(dx, dy));
            }
        }
        Self {
            weights,
            width: side,
            height: side,
        }
    }

    /// Returns the kernel width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the kernel height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

/// Sums `kernel` over the `N x N` window centred on `(cx, cy)`.
///
/// The caller guarantees the window lies inside the raster.
#[inline]
pub(crate) fn correlate_fixed<const N: usize>(
    src: &[u8],
    width: usize,
    cx: usize,
    cy: usize,
    kernel: &[[i32; N]; N],
) -> i32 {
    let r = N / 2;
    let mut sum = 0i32;
    for (j, krow) in kernel.iter().enumerate() {
        let base = (cy + j - r) * width + cx - r;
        let row = &src[base..base + N];
        for (&pixel, &w) in row.iter().zip(krow.iter()) {
            sum += i32::from(pixel) * w;
        }
    }
    sum
}

/// Evaluates `f(x, y)` for every pixel at least `border` pixels away from the
/// raster edge; the border stays 0.
pub(crate) fn map_interior<F>(raster: &Raster, border: usize, f: F) -> Raster
where
    F: Fn(usize, usize) -> u8,
{
    let (width, height) = raster.dimensions();
    let mut out = vec![0u8; width * height];
    for y in border..height.saturating_sub(border) {
        let row = &mut out[y * width..(y + 1) * width];
        for x in border..width.saturating_sub(border) {
            row[x] = f(x, y);
        }
    }
    Raster::from_parts(out, width, height)
}

/// Separable convolution on the rayon pool when `parallel` is set and the
/// feature is enabled, scalar otherwise.
pub(crate) fn convolve_separable_with(raster: &Raster, kernel: &Kernel1d, parallel: bool) -> Raster {
    #[cfg(feature = "rayon")]
    if parallel {
        return rayon::convolve_separable_par(raster, kernel);
    }
    #[cfg(not(feature = "rayon"))]
    let _ = parallel;
    scalar::convolve_separable(raster, kernel)
}

/// Unclamped 2D response, parallel when requested and available.
pub(crate) fn correlate_with(raster: &Raster, kernel: &Kernel2d, parallel: bool) -> Vec<f64> {
    #[cfg(feature = "rayon")]
    if parallel {
        return rayon::correlate_par(raster, kernel);
    }
    #[cfg(not(feature = "rayon"))]
    let _ = parallel;
    scalar::correlate(raster, kernel)
}

/// 2D convolution, parallel when requested and available.
pub(crate) fn convolve_with(raster: &Raster, kernel: &Kernel2d, parallel: bool) -> Raster {
    #[cfg(feature = "rayon")]
    if parallel {
        return rayon::convolve_par(raster, kernel);
    }
    #[cfg(not(feature = "rayon"))]
    let _ = parallel;
    scalar::convolve(raster, kernel)
}

#[cfg(test)]
mod tests {
    use super::{correlate_fixed, Kernel1d, Kernel2d};

    #[test]
    fn gaussian_kernel_is_normalized_and_symmetric() {
        let k = Kernel1d::gaussian(1.5).unwrap();
        assert_eq!(k.radius(), 5);
        let sum: f64 = k.weights().iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        let w = k.weights();
        for i in 0..w.len() {
            assert_eq!(w[i], w[w.len() - 1 - i]);
        }
    }

    #[test]
    fn zero_sigma_is_identity_tap() {
        let k = Kernel1d::gaussian(0.0).unwrap();
        assert_eq!(k.weights(), &[1.0]);
        assert!(Kernel1d::gaussian(-1.0).is_err());
    }

    #[test]
    fn underflowing_sigma_is_identity_tap() {
        let k = Kernel1d::gaussian(1e-170).unwrap();
        assert_eq!(k.weights(), &[1.0]);
    }

    #[test]
    fn oversized_sigma_is_rejected_before_allocation() {
        assert!(Kernel1d::gaussian(1e18).is_err());
        assert!(Kernel1d::gaussian(f64::INFINITY).is_err());
    }

    #[test]
    fn kernel2d_requires_odd_sides() {
        assert!(Kernel2d::new(vec![0.0; 4], 2, 2).is_err());
        assert!(Kernel2d::new(vec![0.0; 3], 3, 3).is_err());
        assert!(Kernel2d::new(vec![0.0; 9], 3, 3).is_ok());
    }

    #[test]
    fn correlate_fixed_does_not_flip() {
        let src: Vec<u8> = (1u8..=9).collect();
        let kernel = [[0, 0, 0], [0, 0, 1], [0, 0, 0]];
        assert_eq!(correlate_fixed(&src, 3, 1, 1, &kernel), 6);
    }
}
