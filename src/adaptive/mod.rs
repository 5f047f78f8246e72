//! Region-adaptive processing: block statistics and per-block filter dispatch.

pub mod dispatch;
pub mod stats;

pub use dispatch::{
    AdaptiveRegionDispatcher, BlockClass, ClassifyThresholds, DispatchConfig, ProcessingRule,
};
pub use stats::BlockStatistics;
