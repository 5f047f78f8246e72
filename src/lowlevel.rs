//! Low-level building blocks for custom pipelines.
//!
//! These expose the convolution engine, the individual algorithm functions
//! and block statistics. Most users should prefer [`crate::Filter`] and
//! [`crate::AdaptiveRegionDispatcher`].

pub use crate::adaptive::stats::{BlockStatistics, EDGE_PIXEL_THRESHOLD};
pub use crate::combine::{combine, combine_all};
pub use crate::filter::edge_flow::edge_flow;
pub use crate::filter::gabor::gabor;
pub use crate::filter::gaussian::{dog, gaussian_blur};
pub use crate::filter::gradient::{kirsch, prewitt, roberts, scharr, sobel};
pub use crate::filter::laplacian::{laplacian, log};
pub use crate::filter::phase::{phase_congruency, SCALE_FREQUENCIES, SIGMA_PER_FREQUENCY};
pub use crate::filter::scale_space::scale_space;
pub use crate::image::region::block_grid;
pub use crate::kernel::scalar::{convolve, convolve_separable, correlate};
pub use crate::kernel::{Kernel1d, Kernel2d, MAX_SIGMA};

#[cfg(feature = "rayon")]
pub use crate::kernel::rayon::{convolve_par, convolve_separable_par, correlate_par};
