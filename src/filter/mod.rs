//! Edge-detection filter library.
//!
//! Every algorithm is a pure `&Raster -> Raster` function that allocates a
//! fresh output. [`Filter`] binds an algorithm to its parameters as a value,
//! so rule tables and presets can store filters and compositions alike;
//! [`FilterKind`] is the parameter-free name used for parsing and display.

use crate::combine::combine;
use crate::image::Raster;
use crate::trace::trace_span;
use crate::util::{EdgeSketchError, EdgeSketchResult};
use std::fmt;
use std::str::FromStr;

pub mod edge_flow;
pub mod gabor;
pub mod gaussian;
pub mod gradient;
pub mod laplacian;
pub mod phase;
pub mod scale_space;

pub use gabor::GaborConfig;
pub use gaussian::{DogConfig, GaussianConfig};
pub use phase::PhaseCongruencyConfig;
pub use scale_space::ScaleSpaceConfig;

/// Names of the individual algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Sobel,
    Prewitt,
    Scharr,
    Roberts,
    Kirsch,
    Log,
    GaussianBlur,
    Dog,
    Gabor,
    PhaseCongruency,
    EdgeFlow,
    ScaleSpace,
}

impl FilterKind {
    /// All algorithms in declaration order.
    pub const ALL: [FilterKind; 12] = [
        FilterKind::Sobel,
        FilterKind::Prewitt,
        FilterKind::Scharr,
        FilterKind::Roberts,
        FilterKind::Kirsch,
        FilterKind::Log,
        FilterKind::GaussianBlur,
        FilterKind::Dog,
        FilterKind::Gabor,
        FilterKind::PhaseCongruency,
        FilterKind::EdgeFlow,
        FilterKind::ScaleSpace,
    ];

    /// Stable snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Sobel => "sobel",
            FilterKind::Prewitt => "prewitt",
            FilterKind::Scharr => "scharr",
            FilterKind::Roberts => "roberts",
            FilterKind::Kirsch => "kirsch",
            FilterKind::Log => "log",
            FilterKind::GaussianBlur => "gaussian",
            FilterKind::Dog => "dog",
            FilterKind::Gabor => "gabor",
            FilterKind::PhaseCongruency => "phase_congruency",
            FilterKind::EdgeFlow => "edge_flow",
            FilterKind::ScaleSpace => "scale_space",
        }
    }

    /// The filter with every parameter at its default.
    pub fn default_filter(self) -> Filter {
        match self {
            FilterKind::Sobel => Filter::Sobel,
            FilterKind::Prewitt => Filter::Prewitt,
            FilterKind::Scharr => Filter::Scharr,
            FilterKind::Roberts => Filter::Roberts,
            FilterKind::Kirsch => Filter::Kirsch,
            FilterKind::Log => Filter::Log,
            FilterKind::GaussianBlur => Filter::GaussianBlur(GaussianConfig::default()),
            FilterKind::Dog => Filter::Dog(DogConfig::default()),
            FilterKind::Gabor => Filter::Gabor(GaborConfig::default()),
            FilterKind::PhaseCongruency => {
                Filter::PhaseCongruency(PhaseCongruencyConfig::default())
            }
            FilterKind::EdgeFlow => Filter::EdgeFlow,
            FilterKind::ScaleSpace => Filter::ScaleSpace(ScaleSpaceConfig::default()),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = EdgeSketchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        FilterKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == needle)
            .ok_or_else(|| EdgeSketchError::UnknownFilter {
                name: needle.to_string(),
            })
    }
}

/// A filter bound to its parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    Sobel,
    Prewitt,
    Scharr,
    Roberts,
    Kirsch,
    Log,
    GaussianBlur(GaussianConfig),
    Dog(DogConfig),
    Gabor(GaborConfig),
    PhaseCongruency(PhaseCongruencyConfig),
    EdgeFlow,
    ScaleSpace(ScaleSpaceConfig),
    /// Applies each member to the same input and folds the outputs left to
    /// right through [`combine`].
    Combine(Vec<Filter>),
}

impl Filter {
    /// Algorithm name, or `None` for a combination.
    pub fn kind(&self) -> Option<FilterKind> {
        let kind = match self {
            Filter::Sobel => FilterKind::Sobel,
            Filter::Prewitt => FilterKind::Prewitt,
            Filter::Scharr => FilterKind::Scharr,
            Filter::Roberts => FilterKind::Roberts,
            Filter::Kirsch => FilterKind::Kirsch,
            Filter::Log => FilterKind::Log,
            Filter::GaussianBlur(_) => FilterKind::GaussianBlur,
            Filter::Dog(_) => FilterKind::Dog,
            Filter::Gabor(_) => FilterKind::Gabor,
            Filter::PhaseCongruency(_) => FilterKind::PhaseCongruency,
            Filter::EdgeFlow => FilterKind::EdgeFlow,
            Filter::ScaleSpace(_) => FilterKind::ScaleSpace,
            Filter::Combine(_) => return None,
        };
        Some(kind)
    }

    /// Combination of the default filters named by `kinds`, in order.
    pub fn combination(kinds: &[FilterKind]) -> Filter {
        Filter::Combine(kinds.iter().map(|kind| kind.default_filter()).collect())
    }

    /// Parses `name` or a `+`-joined list such as `sobel+log`.
    pub fn parse(names: &str) -> EdgeSketchResult<Filter> {
        let kinds = names
            .split('+')
            .map(str::parse::<FilterKind>)
            .collect::<EdgeSketchResult<Vec<_>>>()?;
        match kinds.as_slice() {
            [single] => Ok(single.default_filter()),
            _ => Ok(Filter::combination(&kinds)),
        }
    }

    /// Checks every bound parameter without touching pixels.
    pub fn validate(&self) -> EdgeSketchResult<()> {
        match self {
            Filter::GaussianBlur(cfg) => cfg.validate(),
            Filter::Dog(cfg) => cfg.validate(),
            Filter::Gabor(cfg) => cfg.validate(),
            Filter::PhaseCongruency(cfg) => cfg.validate(),
            Filter::ScaleSpace(cfg) => cfg.validate(),
            Filter::Combine(members) => {
                if members.is_empty() {
                    return Err(EdgeSketchError::InvalidInput("empty filter combination"));
                }
                members.iter().try_for_each(Filter::validate)
            }
            Filter::Sobel
            | Filter::Prewitt
            | Filter::Scharr
            | Filter::Roberts
            | Filter::Kirsch
            | Filter::Log
            | Filter::EdgeFlow => Ok(()),
        }
    }

    /// Runs the filter sequentially.
    pub fn apply(&self, raster: &Raster) -> EdgeSketchResult<Raster> {
        self.apply_with(raster, false)
    }

    /// Runs the filter, using the rayon pool for the blur, Gabor and phase
    /// congruency stages when `parallel` is set and the `rayon` feature is
    /// enabled. The output does not depend on `parallel`.
    pub fn apply_with(&self, raster: &Raster, parallel: bool) -> EdgeSketchResult<Raster> {
        self.validate()?;
        let _span = trace_span!(
            "apply_filter",
            filter = %self,
            width = raster.width(),
            height = raster.height()
        )
        .entered();
        self.run(raster, parallel)
    }

    fn run(&self, raster: &Raster, parallel: bool) -> EdgeSketchResult<Raster> {
        match self {
            Filter::Sobel => Ok(gradient::sobel(raster)),
            Filter::Prewitt => Ok(gradient::prewitt(raster)),
            Filter::Scharr => Ok(gradient::scharr(raster)),
            Filter::Roberts => Ok(gradient::roberts(raster)),
            Filter::Kirsch => Ok(gradient::kirsch(raster)),
            Filter::Log => Ok(laplacian::log(raster)),
            Filter::GaussianBlur(cfg) => gaussian::gaussian_blur_with(raster, cfg.sigma, parallel),
            Filter::Dog(cfg) => gaussian::dog_with(raster, cfg, parallel),
            Filter::Gabor(cfg) => gabor::gabor_with(raster, cfg, parallel),
            Filter::PhaseCongruency(cfg) => phase::phase_congruency_with(raster, cfg, parallel),
            Filter::EdgeFlow => Ok(edge_flow::edge_flow(raster)),
            Filter::ScaleSpace(cfg) => scale_space::scale_space_with(raster, cfg, parallel),
            Filter::Combine(members) => {
                let (first, rest) = members
                    .split_first()
                    .ok_or(EdgeSketchError::InvalidInput("empty filter combination"))?;
                let mut acc = first.run(raster, parallel)?;
                for member in rest {
                    acc = combine(&acc, &member.run(raster, parallel)?)?;
                }
                Ok(acc)
            }
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Combine(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str("+")?;
                    }
                    match member {
                        Filter::Combine(_) => write!(f, "({member})")?,
                        _ => write!(f, "{member}")?,
                    }
                }
                Ok(())
            }
            other => match other.kind() {
                Some(kind) => f.write_str(kind.name()),
                None => Ok(()),
            },
        }
    }
}

/// Applies `filter` to `raster`.
pub fn apply_filter(raster: &Raster, filter: &Filter) -> EdgeSketchResult<Raster> {
    filter.apply(raster)
}

#[cfg(test)]
mod tests {
    use super::{Filter, FilterKind};
    use crate::image::Raster;

    #[test]
    fn names_round_trip_through_parse() {
        for kind in FilterKind::ALL {
            assert_eq!(kind.name().parse::<FilterKind>().unwrap(), kind);
        }
        assert!("canny".parse::<FilterKind>().is_err());
    }

    #[test]
    fn plus_joined_spec_builds_combination() {
        let filter = Filter::parse("sobel + dog").unwrap();
        assert_eq!(
            filter,
            Filter::combination(&[FilterKind::Sobel, FilterKind::Dog])
        );
        assert_eq!(filter.to_string(), "sobel+dog");
        assert_eq!(Filter::parse("kirsch").unwrap(), Filter::Kirsch);
    }

    #[test]
    fn combination_matches_manual_fold() {
        let raster = Raster::from_fn(10, 8, |x, y| ((x * 19 + y * 41) % 256) as u8).unwrap();
        let filter = Filter::combination(&[FilterKind::Sobel, FilterKind::Log, FilterKind::Roberts]);
        let manual = crate::combine::combine_all(&[
            Filter::Sobel.apply(&raster).unwrap(),
            Filter::Log.apply(&raster).unwrap(),
            Filter::Roberts.apply(&raster).unwrap(),
        ])
        .unwrap();
        assert_eq!(filter.apply(&raster).unwrap(), manual);
    }

    #[test]
    fn empty_combination_is_invalid() {
        let raster = Raster::filled(3, 3, 0).unwrap();
        assert!(Filter::Combine(Vec::new()).apply(&raster).is_err());
    }
}
