//! Phase congruency over a bank of quadrature Gabor pairs.
//!
//! For every (orientation, scale) pair the image is correlated with an even
//! (cosine) and odd (sine) kernel sharing an isotropic Gaussian envelope.
//! Each pixel accumulates `|r| * (1 - cos(arg r))` over the bank, and the
//! energy map is normalized by its global maximum. Bank entries are
//! accumulated one at a time in orientation-major order; the parallel path
//! only splits each correlation by rows, so it produces identical output and
//! never holds more than one pair of response maps.

use crate::image::Raster;
use crate::kernel::{correlate_with, Kernel2d};
use crate::trace::{trace_event, trace_span};
use crate::util::math::{clamp_to_u8, gaussian_radius};
use crate::util::{EdgeSketchError, EdgeSketchResult};
use std::f64::consts::PI;

/// Centre frequencies of the scale bank, finest first.
pub const SCALE_FREQUENCIES: [f64; 4] = [1.0, 2.0, 4.0, 8.0];

/// Envelope sigma per unit of frequency.
pub const SIGMA_PER_FREQUENCY: f64 = 0.55;

/// Phase congruency parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseCongruencyConfig {
    /// Number of orientations, evenly spaced over `[0, pi)`.
    pub num_orientations: usize,
    /// Number of scales taken from [`SCALE_FREQUENCIES`] (1..=4).
    pub num_scales: usize,
}

impl Default for PhaseCongruencyConfig {
    fn default() -> Self {
        Self {
            num_orientations: 4,
            num_scales: 4,
        }
    }
}

impl PhaseCongruencyConfig {
    pub(crate) fn validate(&self) -> EdgeSketchResult<()> {
        if self.num_orientations == 0 {
            return Err(EdgeSketchError::InvalidParameter {
                name: "num_orientations",
                value: 0.0,
            });
        }
        if self.num_scales == 0 || self.num_scales > SCALE_FREQUENCIES.len() {
            return Err(EdgeSketchError::InvalidParameter {
                name: "num_scales",
                value: self.num_scales as f64,
            });
        }
        Ok(())
    }

    fn bank(&self) -> Vec<(f64, f64)> {
        let mut bank = Vec::with_capacity(self.num_orientations * self.num_scales);
        for orientation in 0..self.num_orientations {
            let theta = orientation as f64 * PI / self.num_orientations as f64;
            for &frequency in &SCALE_FREQUENCIES[..self.num_scales] {
                bank.push((theta, frequency));
            }
        }
        bank
    }
}

/// Even and odd kernels for one (orientation, frequency) pair.
fn quadrature_pair(theta: f64, frequency: f64) -> (Kernel2d, Kernel2d) {
    let sigma = frequency * SIGMA_PER_FREQUENCY;
    let radius = gaussian_radius(sigma);
    let (sin_t, cos_t) = theta.sin_cos();
    let two_sigma_sq = 2.0 * sigma * sigma;
    let taps = |i: isize, j: isize| {
        let (i, j) = (i as f64, j as f64);
        let x_theta = i * cos_t + j * sin_t;
        let y_theta = -i * sin_t + j * cos_t;
        let envelope = (-(x_theta * x_theta + y_theta * y_theta) / two_sigma_sq).exp();
        let phase = 2.0 * PI * frequency * x_theta;
        (envelope * phase.cos(), envelope * phase.sin())
    };
    let even = Kernel2d::from_fn(radius, |i, j| taps(i, j).0);
    let odd = Kernel2d::from_fn(radius, |i, j| taps(i, j).1);
    (even, odd)
}

/// `|r| * (1 - cos(arg r))` for one complex response `r = re + i im`.
#[inline]
fn pixel_energy(re: f64, im: f64) -> f64 {
    let magnitude = (re * re + im * im).sqrt();
    let phase = im.atan2(re);
    magnitude * (1.0 - phase.cos())
}

/// Adds the energy of one bank entry into `energy`.
fn accumulate_pair(
    energy: &mut [f64],
    raster: &Raster,
    theta: f64,
    frequency: f64,
    parallel: bool,
) {
    let (even, odd) = quadrature_pair(theta, frequency);
    let real = correlate_with(raster, &even, parallel);
    let imag = correlate_with(raster, &odd, parallel);
    for ((acc, &re), &im) in energy.iter_mut().zip(&real).zip(&imag) {
        *acc += pixel_energy(re, im);
    }
}

/// Phase congruency edge map scaled to `[0, 255]`.
///
/// A raster whose energy is zero everywhere yields an all-zero output.
pub fn phase_congruency(raster: &Raster, cfg: &PhaseCongruencyConfig) -> EdgeSketchResult<Raster> {
    phase_congruency_with(raster, cfg, false)
}

pub(crate) fn phase_congruency_with(
    raster: &Raster,
    cfg: &PhaseCongruencyConfig,
    parallel: bool,
) -> EdgeSketchResult<Raster> {
    cfg.validate()?;
    let _span = trace_span!(
        "phase_congruency",
        orientations = cfg.num_orientations,
        scales = cfg.num_scales,
        parallel = parallel
    )
    .entered();

    let mut energy = vec![0.0f64; raster.data().len()];
    for (theta, frequency) in cfg.bank() {
        accumulate_pair(&mut energy, raster, theta, frequency, parallel);
    }
    Ok(normalize(raster, &energy))
}

fn normalize(raster: &Raster, energy: &[f64]) -> Raster {
    let max = energy.iter().copied().fold(0.0f64, f64::max);
    trace_event!("phase_congruency_max", max = max);
    let data = if max > 0.0 {
        energy.iter().map(|&e| clamp_to_u8(e / max * 255.0)).collect()
    } else {
        vec![0u8; energy.len()]
    };
    Raster::from_parts(data, raster.width(), raster.height())
}
