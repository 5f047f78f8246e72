//! Single-orientation Gabor filter.

use crate::image::Raster;
use crate::kernel::{convolve_with, Kernel2d};
use crate::util::math::{gaussian_radius, require_non_negative, require_positive};
use crate::util::{EdgeSketchError, EdgeSketchResult};
use std::f64::consts::{FRAC_PI_4, PI};

/// Largest accepted Gabor envelope sigma. The kernel is a dense 2D window of
/// side `2 * ceil(3 sigma) + 1`, so it gets a tighter bound than the separable
/// Gaussian.
pub const MAX_GABOR_SIGMA: f64 = 64.0;

/// Gabor filter parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaborConfig {
    /// Orientation of the carrier in radians.
    pub theta: f64,
    /// Carrier wavelength in pixels.
    pub lambda: f64,
    /// Envelope standard deviation; the window radius is `ceil(3 sigma)`.
    pub sigma: f64,
    /// Spatial aspect ratio of the envelope.
    pub gamma: f64,
}

impl Default for GaborConfig {
    fn default() -> Self {
        Self {
            theta: FRAC_PI_4,
            lambda: 4.0,
            sigma: 2.0,
            gamma: 0.5,
        }
    }
}

impl GaborConfig {
    pub(crate) fn validate(&self) -> EdgeSketchResult<()> {
        if !self.theta.is_finite() {
            return Err(EdgeSketchError::InvalidParameter {
                name: "theta",
                value: self.theta,
            });
        }
        require_positive("lambda", self.lambda)?;
        if !(2.0 * PI / self.lambda).is_finite() {
            return Err(EdgeSketchError::InvalidParameter {
                name: "lambda",
                value: self.lambda,
            });
        }
        require_positive("sigma", self.sigma)?;
        if self.sigma > MAX_GABOR_SIGMA {
            return Err(EdgeSketchError::InvalidParameter {
                name: "sigma",
                value: self.sigma,
            });
        }
        require_non_negative("gamma", self.gamma)?;
        if !(self.gamma * self.gamma).is_finite() {
            return Err(EdgeSketchError::InvalidParameter {
                name: "gamma",
                value: self.gamma,
            });
        }
        Ok(())
    }

    /// Builds the even (cosine) Gabor kernel.
    ///
    /// A sigma whose square underflows collapses the envelope onto the centre
    /// tap, giving the 1x1 identity kernel.
    pub fn kernel(&self) -> EdgeSketchResult<Kernel2d> {
        self.validate()?;
        let (sin_t, cos_t) = self.theta.sin_cos();
        let two_sigma_sq = 2.0 * self.sigma * self.sigma;
        if two_sigma_sq == 0.0 {
            return Ok(Kernel2d::from_fn(0, |_, _| 1.0));
        }
        let gamma_sq = self.gamma * self.gamma;
        Ok(Kernel2d::from_fn(gaussian_radius(self.sigma), |i, j| {
            let (i, j) = (i as f64, j as f64);
            let x_theta = i * cos_t + j * sin_t;
            let y_theta = -i * sin_t + j * cos_t;
            let envelope = (-(x_theta * x_theta + gamma_sq * y_theta * y_theta) / two_sigma_sq).exp();
            envelope * (2.0 * PI * x_theta / self.lambda).cos()
        }))
    }
}

/// Gabor response clamped to `[0, 255]`, clamp-to-edge sampling.
pub fn gabor(raster: &Raster, cfg: &GaborConfig) -> EdgeSketchResult<Raster> {
    gabor_with(raster, cfg, false)
}

pub(crate) fn gabor_with(
    raster: &Raster,
    cfg: &GaborConfig,
    parallel: bool,
) -> EdgeSketchResult<Raster> {
    let kernel = cfg.kernel()?;
    Ok(convolve_with(raster, &kernel, parallel))
}

#[cfg(test)]
mod tests {
    use super::{gabor, GaborConfig};
    use crate::image::Raster;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_6, PI};

    fn impulse(value: u8) -> Raster {
        Raster::from_fn(15, 15, |x, y| if (x, y) == (7, 7) { value } else { 0 }).unwrap()
    }

    #[test]
    fn impulse_response_matches_rotated_envelope() {
        let cfg = GaborConfig {
            theta: FRAC_PI_6,
            lambda: 4.0,
            sigma: 2.0,
            gamma: 0.5,
        };
        let out = gabor(&impulse(200), &cfg).unwrap();
        // Correlation with an impulse at (7, 7): out(7 - dx, 7 - dy) = 200 * w(dx, dy).
        let tap = |x_theta: f64, y_theta: f64| {
            let envelope = (-(x_theta * x_theta + 0.25 * y_theta * y_theta) / 8.0).exp();
            envelope * (2.0 * PI * x_theta / 4.0).cos()
        };
        let half_sqrt3 = 3f64.sqrt() / 2.0;
        // (dx, dy) = (1, 0): x' = cos 30deg, y' = -sin 30deg.
        let w10 = tap(half_sqrt3, -0.5);
        // (dx, dy) = (0, 1): x' = sin 30deg, y' = cos 30deg.
        let w01 = tap(0.5, half_sqrt3);
        assert_eq!(out.get(6, 7), Some((200.0 * w10) as u8));
        assert_eq!(out.get(7, 6), Some((200.0 * w01) as u8));
        assert_eq!(out.get(6, 7), Some(37));
        assert_eq!(out.get(7, 6), Some(133));
    }

    #[test]
    fn carrier_orientation_selects_edges() {
        let line = Raster::from_fn(15, 15, |x, _| if x == 7 { 255 } else { 0 }).unwrap();
        let across = GaborConfig {
            theta: 0.0,
            ..GaborConfig::default()
        };
        let along = GaborConfig {
            theta: FRAC_PI_2,
            ..GaborConfig::default()
        };
        let strong = gabor(&line, &across).unwrap().get(7, 7).unwrap();
        let weak = gabor(&line, &along).unwrap().get(7, 7).unwrap();
        assert_eq!(strong, 255);
        // 255 * sum_j exp(-j^2 / 8) cos(pi j / 2) over j in -6..=6 is about 9.02.
        assert_eq!(weak, 9);
    }

    #[test]
    fn underflowing_sigma_is_identity() {
        let raster = Raster::from_fn(8, 8, |x, y| (x * 20 + y * 3) as u8).unwrap();
        let cfg = GaborConfig {
            sigma: 1e-170,
            ..GaborConfig::default()
        };
        assert_eq!(cfg.kernel().unwrap().width(), 1);
        assert_eq!(gabor(&raster, &cfg).unwrap(), raster);
    }

    #[test]
    fn oversized_sigma_is_rejected() {
        let raster = Raster::filled(4, 4, 1).unwrap();
        let cfg = GaborConfig {
            sigma: 1e18,
            ..GaborConfig::default()
        };
        assert!(gabor(&raster, &cfg).is_err());
    }

    #[test]
    fn default_kernel_has_three_sigma_window() {
        let kernel = GaborConfig::default().kernel().unwrap();
        assert_eq!(kernel.width(), 13);
        assert_eq!(kernel.height(), 13);
        // Centre tap: unit envelope, cos(0) = 1.
        assert!((kernel.weights()[6 * 13 + 6] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_raster_stays_zero() {
        let raster = Raster::filled(8, 8, 0).unwrap();
        let out = gabor(&raster, &GaborConfig::default()).unwrap();
        assert!(out.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn rejects_zero_wavelength() {
        let raster = Raster::filled(4, 4, 1).unwrap();
        let cfg = GaborConfig {
            lambda: 0.0,
            ..GaborConfig::default()
        };
        assert!(gabor(&raster, &cfg).is_err());
    }
}
