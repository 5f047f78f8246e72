//! Lindeberg-style scale-space edge emphasis.

use crate::filter::gaussian::gaussian_blur_with;
use crate::filter::laplacian::laplacian;
use crate::image::Raster;
use crate::util::math::{require_positive, require_positive_sigma, MAX_SIGMA};
use crate::util::{EdgeSketchError, EdgeSketchResult};

/// Scale-space parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleSpaceConfig {
    /// Sigma of the finest scale.
    pub initial_sigma: f64,
    /// Number of scales to evaluate.
    pub scales: usize,
    /// Multiplicative sigma step between consecutive scales.
    pub scale_step: f64,
}

impl Default for ScaleSpaceConfig {
    fn default() -> Self {
        Self {
            initial_sigma: 1.0,
            scales: 5,
            scale_step: 1.5,
        }
    }
}

impl ScaleSpaceConfig {
    pub(crate) fn validate(&self) -> EdgeSketchResult<()> {
        require_positive_sigma("initial_sigma", self.initial_sigma)?;
        require_positive("scale_step", self.scale_step)?;
        if self.scales == 0 {
            return Err(EdgeSketchError::InvalidParameter {
                name: "scales",
                value: 0.0,
            });
        }
        // The sigma grows geometrically; every visited scale must stay bounded.
        self.sigmas()
            .into_iter()
            .try_for_each(|sigma| require_positive_sigma("scale_sigma", sigma))
    }

    /// Sigmas visited, finest first.
    ///
    /// Stops early once a sigma leaves the valid range, so the list stays
    /// short for any scale count; validation then rejects the config.
    pub fn sigmas(&self) -> Vec<f64> {
        let mut sigma = self.initial_sigma;
        let mut out = Vec::new();
        for _ in 0..self.scales {
            out.push(sigma);
            if !(sigma.is_finite() && sigma > 0.0 && sigma <= MAX_SIGMA) {
                break;
            }
            sigma *= self.scale_step;
        }
        out
    }
}

/// Per-pixel maximum of `|Laplacian(blur(raster, sigma))|` over all scales.
pub fn scale_space(raster: &Raster, cfg: &ScaleSpaceConfig) -> EdgeSketchResult<Raster> {
    scale_space_with(raster, cfg, false)
}

pub(crate) fn scale_space_with(
    raster: &Raster,
    cfg: &ScaleSpaceConfig,
    parallel: bool,
) -> EdgeSketchResult<Raster> {
    cfg.validate()?;
    let mut strongest = vec![0u8; raster.data().len()];
    for sigma in cfg.sigmas() {
        let response = laplacian(&gaussian_blur_with(raster, sigma, parallel)?);
        for (acc, &v) in strongest.iter_mut().zip(response.data()) {
            *acc = (*acc).max(v);
        }
    }
    Ok(Raster::from_parts(strongest, raster.width(), raster.height()))
}

#[cfg(test)]
mod tests {
    use super::{scale_space, ScaleSpaceConfig};
    use crate::filter::gaussian::gaussian_blur;
    use crate::filter::laplacian::laplacian;
    use crate::image::Raster;
    use crate::util::EdgeSketchError;

    #[test]
    fn sigmas_follow_geometric_progression() {
        let sigmas = ScaleSpaceConfig::default().sigmas();
        assert_eq!(sigmas.len(), 5);
        assert!((sigmas[4] - 1.5f64.powi(4)).abs() < 1e-12);
    }

    #[test]
    fn single_scale_equals_blurred_laplacian() {
        let raster = Raster::from_fn(12, 12, |x, y| ((x * 37 + y * 11) % 200) as u8).unwrap();
        let cfg = ScaleSpaceConfig {
            scales: 1,
            ..ScaleSpaceConfig::default()
        };
        let expected = laplacian(&gaussian_blur(&raster, 1.0).unwrap());
        assert_eq!(scale_space(&raster, &cfg).unwrap(), expected);
    }

    #[test]
    fn runaway_scale_count_is_rejected_up_front() {
        let raster = Raster::filled(8, 8, 50).unwrap();
        let cfg = ScaleSpaceConfig {
            scales: 110,
            ..ScaleSpaceConfig::default()
        };
        assert!(cfg.sigmas().len() < 110);
        assert!(matches!(
            scale_space(&raster, &cfg),
            Err(EdgeSketchError::InvalidParameter {
                name: "scale_sigma",
                ..
            })
        ));
    }

    #[test]
    fn more_scales_never_lower_the_response() {
        let raster = Raster::from_fn(16, 16, |x, y| if (x / 4 + y / 4) % 2 == 0 { 0 } else { 255 })
            .unwrap();
        let one = scale_space(
            &raster,
            &ScaleSpaceConfig {
                scales: 1,
                ..ScaleSpaceConfig::default()
            },
        )
        .unwrap();
        let all = scale_space(&raster, &ScaleSpaceConfig::default()).unwrap();
        for (a, b) in one.data().iter().zip(all.data()) {
            assert!(b >= a);
        }
    }
}
