//! Numeric helpers shared by the filters.

use crate::util::{EdgeSketchError, EdgeSketchResult};

/// Largest accepted Gaussian sigma. Keeps every `ceil(3 sigma)` window,
/// and with it every kernel allocation, bounded.
pub const MAX_SIGMA: f64 = 512.0;

/// Slack added before truncation so that a sum that should be an exact
/// integer but lands a few ulps below it keeps its value.
const TRUNCATION_SLACK: f64 = 1e-9;

/// Clamps a floating-point sample into `[0, 255]` and truncates it to a pixel.
///
/// NaN maps to 0.
#[inline]
pub(crate) fn clamp_to_u8(value: f64) -> u8 {
    (value + TRUNCATION_SLACK).clamp(0.0, 255.0) as u8
}

/// Clamps an integer accumulator into `[0, 255]`.
#[inline]
pub(crate) fn clamp_i32_to_u8(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Truncated Euclidean norm of an integer gradient, clamped to a pixel.
#[inline]
pub(crate) fn magnitude_u8(gx: i32, gy: i32) -> u8 {
    let squared = f64::from(gx * gx + gy * gy);
    clamp_i32_to_u8(squared.sqrt() as i32)
}

/// Window radius covering three standard deviations: `ceil(3 * sigma)`.
#[inline]
pub(crate) fn gaussian_radius(sigma: f64) -> usize {
    (3.0 * sigma).ceil().max(0.0) as usize
}

/// Samples a coordinate with clamp-to-edge semantics.
#[inline]
pub(crate) fn clamp_coord(pos: isize, len: usize) -> usize {
    pos.clamp(0, len as isize - 1) as usize
}

/// Rejects non-finite or non-positive parameters.
pub(crate) fn require_positive(name: &'static str, value: f64) -> EdgeSketchResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EdgeSketchError::InvalidParameter { name, value })
    }
}

/// Rejects non-finite or negative parameters.
pub(crate) fn require_non_negative(name: &'static str, value: f64) -> EdgeSketchResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EdgeSketchError::InvalidParameter { name, value })
    }
}

/// Rejects a sigma that is non-finite, negative or above [`MAX_SIGMA`].
pub(crate) fn require_sigma(name: &'static str, value: f64) -> EdgeSketchResult<()> {
    require_non_negative(name, value)?;
    if value > MAX_SIGMA {
        return Err(EdgeSketchError::InvalidParameter { name, value });
    }
    Ok(())
}

/// [`require_sigma`], additionally rejecting 0.
pub(crate) fn require_positive_sigma(name: &'static str, value: f64) -> EdgeSketchResult<()> {
    require_positive(name, value)?;
    require_sigma(name, value)
}

#[cfg(test)]
mod tests {
    use super::{
        clamp_coord, clamp_to_u8, gaussian_radius, magnitude_u8, require_positive,
        require_positive_sigma, require_sigma, MAX_SIGMA,
    };

    #[test]
    fn clamp_to_u8_truncates_and_saturates() {
        assert_eq!(clamp_to_u8(-3.5), 0);
        assert_eq!(clamp_to_u8(12.99), 12);
        assert_eq!(clamp_to_u8(300.0), 255);
        assert_eq!(clamp_to_u8(f64::NAN), 0);
        assert_eq!(clamp_to_u8(77.0 - 1e-13), 77);
    }

    #[test]
    fn magnitude_matches_truncated_norm() {
        assert_eq!(magnitude_u8(3, 4), 5);
        assert_eq!(magnitude_u8(1, 1), 1);
        assert_eq!(magnitude_u8(1020, 0), 255);
    }

    #[test]
    fn gaussian_radius_is_three_sigma_ceiling() {
        assert_eq!(gaussian_radius(1.0), 3);
        assert_eq!(gaussian_radius(0.55), 2);
        assert_eq!(gaussian_radius(0.0), 0);
    }

    #[test]
    fn clamp_coord_stays_inside() {
        assert_eq!(clamp_coord(-4, 10), 0);
        assert_eq!(clamp_coord(12, 10), 9);
        assert_eq!(clamp_coord(5, 10), 5);
    }

    #[test]
    fn require_positive_rejects_zero_and_nan() {
        assert!(require_positive("sigma", 0.0).is_err());
        assert!(require_positive("sigma", f64::NAN).is_err());
        assert!(require_positive("sigma", 0.5).is_ok());
    }

    #[test]
    fn sigma_bound_is_enforced() {
        assert!(require_sigma("sigma", 0.0).is_ok());
        assert!(require_sigma("sigma", MAX_SIGMA).is_ok());
        assert!(require_sigma("sigma", MAX_SIGMA * 1.01).is_err());
        assert!(require_sigma("sigma", 1e18).is_err());
        assert!(require_positive_sigma("sigma", 0.0).is_err());
        assert!(require_positive_sigma("sigma", 1e-170).is_ok());
    }
}
