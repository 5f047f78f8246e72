//! Gaussian blur and Difference of Gaussians.

use crate::image::Raster;
use crate::kernel::{convolve_separable_with, Kernel1d};
use crate::util::math::{require_positive_sigma, require_sigma};
use crate::util::EdgeSketchResult;

/// Gaussian blur parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussianConfig {
    /// Standard deviation in pixels; 0 leaves the raster unchanged.
    pub sigma: f64,
}

impl Default for GaussianConfig {
    fn default() -> Self {
        Self { sigma: 1.0 }
    }
}

impl GaussianConfig {
    pub(crate) fn validate(&self) -> EdgeSketchResult<()> {
        require_sigma("sigma", self.sigma)
    }
}

/// Difference of Gaussians parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DogConfig {
    /// Sigma of the finer blur.
    pub sigma1: f64,
    /// Sigma of the coarser blur.
    pub sigma2: f64,
}

impl Default for DogConfig {
    fn default() -> Self {
        Self {
            sigma1: 1.0,
            sigma2: 2.0,
        }
    }
}

impl DogConfig {
    pub(crate) fn validate(&self) -> EdgeSketchResult<()> {
        require_positive_sigma("sigma1", self.sigma1)?;
        require_positive_sigma("sigma2", self.sigma2)
    }
}

/// Separable Gaussian blur with clamp-to-edge sampling.
pub fn gaussian_blur(raster: &Raster, sigma: f64) -> EdgeSketchResult<Raster> {
    gaussian_blur_with(raster, sigma, false)
}

pub(crate) fn gaussian_blur_with(
    raster: &Raster,
    sigma: f64,
    parallel: bool,
) -> EdgeSketchResult<Raster> {
    let kernel = Kernel1d::gaussian(sigma)?;
    Ok(convolve_separable_with(raster, &kernel, parallel))
}

/// `clamp(blur(sigma1) - blur(sigma2) + 128)`; flat areas map to 128.
pub fn dog(raster: &Raster, cfg: &DogConfig) -> EdgeSketchResult<Raster> {
    dog_with(raster, cfg, false)
}

pub(crate) fn dog_with(raster: &Raster, cfg: &DogConfig, parallel: bool) -> EdgeSketchResult<Raster> {
    cfg.validate()?;
    let fine = gaussian_blur_with(raster, cfg.sigma1, parallel)?;
    let coarse = gaussian_blur_with(raster, cfg.sigma2, parallel)?;
    let data = fine
        .data()
        .iter()
        .zip(coarse.data())
        .map(|(&a, &b)| (i32::from(a) - i32::from(b) + 128).clamp(0, 255) as u8)
        .collect();
    Ok(Raster::from_parts(data, raster.width(), raster.height()))
}
