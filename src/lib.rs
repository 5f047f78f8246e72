//! EdgeSketch turns a grayscale photograph into a pencil-sketch-like edge
//! rendering.
//!
//! The crate provides a library of pure raster filters (gradient and
//! Laplacian operators, Gaussian/DoG, Gabor, phase congruency, scale-space
//! analysis and gradient non-maximum suppression), an averaging combiner, and
//! a region-adaptive dispatcher that scores fixed-size blocks and renders
//! each with the filter its texture calls for. Block processing and the
//! heavier filters can run on a rayon pool via the `rayon` feature; image
//! file I/O is available with `image-io`.

pub mod adaptive;
pub mod combine;
pub mod filter;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod sketch;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use crate::adaptive::{
    AdaptiveRegionDispatcher, BlockClass, BlockStatistics, ClassifyThresholds, DispatchConfig,
    ProcessingRule,
};
pub use crate::combine::{combine, combine_all};
pub use crate::filter::{
    apply_filter, DogConfig, Filter, FilterKind, GaborConfig, GaussianConfig,
    PhaseCongruencyConfig, ScaleSpaceConfig,
};
pub use crate::image::{ImageView, Raster, Region};
pub use crate::sketch::{finalize, invert, process_adaptive_regions, sketch_with, sketch_with_par};
pub use crate::util::{EdgeSketchError, EdgeSketchResult};
