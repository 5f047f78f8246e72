//! Region-adaptive filter selection and stitching.
//!
//! The raster is cut into a row-major grid of fixed-size blocks (edge blocks
//! clipped). Each block is scored with [`BlockStatistics`], classified by an
//! ordered rule table, filtered as an independent sub-raster (so filters see
//! the block's own clamp-to-edge boundary, not its neighbours), and written
//! back at its offset in a pre-allocated full-size buffer. Regions are
//! validated to tile the raster exactly before any filter runs, so block
//! results never overlap.

use crate::adaptive::stats::BlockStatistics;
use crate::filter::{DogConfig, Filter, GaussianConfig, PhaseCongruencyConfig};
use crate::image::region::block_grid;
use crate::image::{Raster, Region};
use crate::sketch::finalize_with;
use crate::trace::{trace_event, trace_span};
use crate::util::{EdgeSketchError, EdgeSketchResult};
use std::fmt;

/// Thresholds of the block classification table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifyThresholds {
    /// Smooth blocks have variance below this.
    pub smooth_max_variance: f64,
    /// Smooth blocks have edge density below this.
    pub smooth_max_edge_density: f64,
    /// Smooth blocks have mean gradient below this.
    pub smooth_max_gradient: f64,
    /// High-detail blocks have mean gradient above this.
    pub detail_min_gradient: f64,
    /// High-detail blocks have variance above this.
    pub detail_min_variance: f64,
    /// Flowing blocks have edge density above this.
    pub flow_min_edge_density: f64,
}

impl Default for ClassifyThresholds {
    fn default() -> Self {
        Self {
            smooth_max_variance: 50.0,
            smooth_max_edge_density: 0.05,
            smooth_max_gradient: 10.0,
            detail_min_gradient: 50.0,
            detail_min_variance: 400.0,
            flow_min_edge_density: 0.1,
        }
    }
}

/// Texture class of a block; decides which filter runs on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockClass {
    /// Near-uniform background: Gaussian blur only.
    Smooth,
    /// Strong, dense texture: Sobel combined with DoG.
    HighDetail,
    /// Many bright pixels: edge flow combined with phase congruency.
    Flowing,
    /// Everything else: phase congruency alone.
    Gentle,
}

impl BlockClass {
    /// Classes in rule-table priority order.
    pub const ALL: [BlockClass; 4] = [
        BlockClass::Smooth,
        BlockClass::HighDetail,
        BlockClass::Flowing,
        BlockClass::Gentle,
    ];

    /// First matching rule wins.
    pub fn classify(stats: &BlockStatistics, t: &ClassifyThresholds) -> Self {
        if stats.variance < t.smooth_max_variance
            && stats.edge_density < t.smooth_max_edge_density
            && stats.mean_gradient < t.smooth_max_gradient
        {
            BlockClass::Smooth
        } else if stats.mean_gradient > t.detail_min_gradient
            && stats.variance > t.detail_min_variance
        {
            BlockClass::HighDetail
        } else if stats.edge_density > t.flow_min_edge_density {
            BlockClass::Flowing
        } else {
            BlockClass::Gentle
        }
    }

    /// Filter applied to blocks of this class.
    pub fn filter(self) -> Filter {
        match self {
            BlockClass::Smooth => Filter::GaussianBlur(GaussianConfig { sigma: 1.0 }),
            BlockClass::HighDetail => {
                Filter::Combine(vec![Filter::Sobel, Filter::Dog(DogConfig::default())])
            }
            BlockClass::Flowing => Filter::Combine(vec![
                Filter::EdgeFlow,
                Filter::PhaseCongruency(PhaseCongruencyConfig::default()),
            ]),
            BlockClass::Gentle => Filter::PhaseCongruency(PhaseCongruencyConfig::default()),
        }
    }

    /// Stable snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            BlockClass::Smooth => "smooth",
            BlockClass::HighDetail => "high_detail",
            BlockClass::Flowing => "flowing",
            BlockClass::Gentle => "gentle",
        }
    }
}

impl fmt::Display for BlockClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A region paired with the filter that renders it.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessingRule {
    /// Pixels this rule owns.
    pub region: Region,
    /// Filter applied to the extracted sub-raster.
    pub filter: Filter,
    /// Class that selected the filter, if the rule came from classification.
    pub class: Option<BlockClass>,
}

impl ProcessingRule {
    /// Creates an unclassified rule.
    pub fn new(region: Region, filter: Filter) -> Self {
        Self {
            region,
            filter,
            class: None,
        }
    }
}

/// Dispatcher configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct DispatchConfig {
    /// Side length of the square blocks.
    pub block_size: usize,
    /// Classification thresholds.
    pub thresholds: ClassifyThresholds,
    /// Process blocks on the rayon pool (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            block_size: 32,
            thresholds: ClassifyThresholds::default(),
            parallel: false,
        }
    }
}

/// Partitions a raster, picks a filter per block and stitches the results.
#[derive(Clone, Debug, Default)]
pub struct AdaptiveRegionDispatcher {
    cfg: DispatchConfig,
}

impl AdaptiveRegionDispatcher {
    /// Creates a dispatcher with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: DispatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.cfg
    }

    /// Classifies every block and returns the rule list in row-major order.
    pub fn plan(&self, raster: &Raster) -> EdgeSketchResult<Vec<ProcessingRule>> {
        let blocks = block_grid(raster.width(), raster.height(), self.cfg.block_size)?;
        let mut rules = Vec::with_capacity(blocks.len());
        let mut counts = [0usize; 4];
        for region in blocks {
            let stats = BlockStatistics::compute(raster, region)?;
            let class = BlockClass::classify(&stats, &self.cfg.thresholds);
            counts[class as usize] += 1;
            rules.push(ProcessingRule {
                region,
                filter: class.filter(),
                class: Some(class),
            });
        }
        trace_event!(
            "blocks_classified",
            smooth = counts[0],
            high_detail = counts[1],
            flowing = counts[2],
            gentle = counts[3]
        );
        Ok(rules)
    }

    /// Applies every rule to its sub-raster and stitches the edge map.
    ///
    /// `rules` must tile `raster` exactly: every pixel covered by exactly one
    /// region. The result is not finalized.
    pub fn execute(&self, raster: &Raster, rules: &[ProcessingRule]) -> EdgeSketchResult<Raster> {
        check_tiling(raster, rules)?;
        for rule in rules {
            rule.filter.validate()?;
        }
        let _span = trace_span!(
            "adaptive_regions",
            blocks = rules.len(),
            block_size = self.cfg.block_size,
            parallel = self.cfg.parallel
        )
        .entered();

        let blocks = self.render_blocks(raster, rules)?;
        let (width, height) = raster.dimensions();
        let mut out = vec![0u8; width * height];
        for (rule, block) in rules.iter().zip(&blocks) {
            write_region(&mut out, width, rule.region, block)?;
        }
        Ok(Raster::from_parts(out, width, height))
    }

    /// Plans, executes and finalizes: the full adaptive sketch pipeline.
    pub fn process(&self, raster: &Raster) -> EdgeSketchResult<Raster> {
        let rules = self.plan(raster)?;
        let edges = self.execute(raster, &rules)?;
        finalize_with(&edges, self.cfg.parallel)
    }

    fn render_blocks(
        &self,
        raster: &Raster,
        rules: &[ProcessingRule],
    ) -> EdgeSketchResult<Vec<Raster>> {
        let render = |rule: &ProcessingRule| -> EdgeSketchResult<Raster> {
            let block = raster.extract(rule.region)?;
            rule.filter.apply(&block)
        };

        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            use rayon::prelude::*;
            return rules.par_iter().map(render).collect();
        }

        rules.iter().map(render).collect()
    }
}

/// Errors unless `rules` cover every pixel of `raster` exactly once.
fn check_tiling(raster: &Raster, rules: &[ProcessingRule]) -> EdgeSketchResult<()> {
    let (width, height) = raster.dimensions();
    let mut covered = vec![false; width * height];
    for rule in rules {
        let region = rule.region;
        region.check_within(width, height)?;
        for y in region.y..region.bottom() {
            for cell in &mut covered[y * width + region.x..y * width + region.right()] {
                if *cell {
                    return Err(EdgeSketchError::RegionsNotTiling {
                        reason: "regions overlap",
                    });
                }
                *cell = true;
            }
        }
    }
    if covered.iter().any(|&c| !c) {
        return Err(EdgeSketchError::RegionsNotTiling {
            reason: "regions leave pixels uncovered",
        });
    }
    Ok(())
}

fn write_region(out: &mut [u8], width: usize, region: Region, block: &Raster) -> EdgeSketchResult<()> {
    if block.dimensions() != (region.width, region.height) {
        return Err(EdgeSketchError::DimensionMismatch {
            expected_width: region.width,
            expected_height: region.height,
            got_width: block.width(),
            got_height: block.height(),
        });
    }
    for (y, src) in block.data().chunks_exact(region.width).enumerate() {
        let start = (region.y + y) * width + region.x;
        out[start..start + region.width].copy_from_slice(src);
    }
    Ok(())
}
