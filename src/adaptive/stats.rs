//! Local texture statistics over a rectangular block.

use crate::image::{Raster, Region};
use crate::util::EdgeSketchResult;

/// Pixels strictly above this value count towards edge density.
pub const EDGE_PIXEL_THRESHOLD: u8 = 128;

/// Texture summary of one block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockStatistics {
    /// Population variance of the pixel values, `E[x^2] - E[x]^2`.
    pub variance: f64,
    /// Fraction of pixels brighter than [`EDGE_PIXEL_THRESHOLD`].
    pub edge_density: f64,
    /// Mean central-difference gradient magnitude over the block interior.
    pub mean_gradient: f64,
}

impl BlockStatistics {
    /// Computes the statistics of `region` within `raster`.
    ///
    /// The gradient is sampled on the block shrunk by one pixel on every side,
    /// so it never reads outside the block. Blocks narrower or shorter than
    /// three pixels have no interior and report a mean gradient of 0.
    pub fn compute(raster: &Raster, region: Region) -> EdgeSketchResult<Self> {
        region.check_within(raster.width(), raster.height())?;
        let view = raster.view().roi(region)?;

        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        let mut bright = 0usize;
        for y in 0..region.height {
            let row = view.row(y).unwrap_or_default();
            for &v in row {
                let v64 = f64::from(v);
                sum += v64;
                sum_sq += v64 * v64;
                if v > EDGE_PIXEL_THRESHOLD {
                    bright += 1;
                }
            }
        }
        let count = region.area() as f64;
        let mean = sum / count;
        let variance = (sum_sq / count - mean * mean).max(0.0);
        let edge_density = bright as f64 / count;

        let mut gradient_sum = 0.0f64;
        let mut interior = 0usize;
        for y in 1..region.height.saturating_sub(1) {
            let (Some(above), Some(row), Some(below)) = (view.row(y - 1), view.row(y), view.row(y + 1))
            else {
                continue;
            };
            for x in 1..region.width.saturating_sub(1) {
                let gx = i32::from(row[x + 1]) - i32::from(row[x - 1]);
                let gy = i32::from(below[x]) - i32::from(above[x]);
                gradient_sum += f64::from(gx * gx + gy * gy).sqrt();
                interior += 1;
            }
        }
        let mean_gradient = if interior > 0 {
            gradient_sum / interior as f64
        } else {
            0.0
        };

        Ok(Self {
            variance,
            edge_density,
            mean_gradient,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::BlockStatistics;
    use crate::image::{Raster, Region};

    #[test]
    fn uniform_block_has_no_texture() {
        let raster = Raster::filled(8, 8, 90).unwrap();
        let stats = BlockStatistics::compute(&raster, raster.bounds()).unwrap();
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.edge_density, 0.0);
        assert_eq!(stats.mean_gradient, 0.0);
    }

    #[test]
    fn statistics_only_read_the_region() {
        let raster = Raster::from_fn(8, 4, |x, _| if x < 4 { 10 } else { 250 }).unwrap();
        let left = BlockStatistics::compute(&raster, Region::new(0, 0, 4, 4)).unwrap();
        let right = BlockStatistics::compute(&raster, Region::new(4, 0, 4, 4)).unwrap();
        assert_eq!(left.edge_density, 0.0);
        assert_eq!(right.edge_density, 1.0);
        assert_eq!(left.mean_gradient, 0.0);
        assert_eq!(right.mean_gradient, 0.0);
    }

    #[test]
    fn horizontal_ramp_gradient() {
        let raster = Raster::from_fn(5, 5, |x, _| (x * 10) as u8).unwrap();
        let stats = BlockStatistics::compute(&raster, raster.bounds()).unwrap();
        // Central difference spans two columns: 20 everywhere inside.
        assert!((stats.mean_gradient - 20.0).abs() < 1e-12);
        assert!((stats.variance - 200.0).abs() < 1e-9);
    }

    #[test]
    fn thin_block_reports_zero_gradient() {
        let raster = Raster::from_fn(6, 2, |x, y| (x * 30 + y * 5) as u8).unwrap();
        let stats = BlockStatistics::compute(&raster, raster.bounds()).unwrap();
        assert_eq!(stats.mean_gradient, 0.0);
    }

    #[test]
    fn rejects_region_outside_raster() {
        let raster = Raster::filled(4, 4, 0).unwrap();
        assert!(BlockStatistics::compute(&raster, Region::new(2, 2, 4, 1)).is_err());
    }
}
