//! Sketch finalization, named presets and top-level entry points.
//!
//! A sketch is an edge map blurred with sigma 1 and inverted, so strong
//! edges become dark strokes on a light background.

use crate::adaptive::AdaptiveRegionDispatcher;
use crate::filter::gaussian::gaussian_blur_with;
use crate::filter::{Filter, FilterKind};
use crate::image::Raster;
use crate::trace::trace_span;
use crate::util::{EdgeSketchError, EdgeSketchResult};

/// Blur applied to an edge map before inversion.
pub const FINALIZE_SIGMA: f64 = 1.0;

/// Named filter combinations, each folded left to right.
pub const COMBINATION_PRESETS: &[(&str, &[FilterKind])] = &[
    ("sobel_prewitt", &[FilterKind::Sobel, FilterKind::Prewitt]),
    ("sobel_log", &[FilterKind::Sobel, FilterKind::Log]),
    ("prewitt_log", &[FilterKind::Prewitt, FilterKind::Log]),
    (
        "dog_phase_congruency",
        &[FilterKind::Dog, FilterKind::PhaseCongruency],
    ),
    (
        "phase_congruency_edge_flow",
        &[FilterKind::PhaseCongruency, FilterKind::EdgeFlow],
    ),
    (
        "scale_space_phase_congruency",
        &[FilterKind::ScaleSpace, FilterKind::PhaseCongruency],
    ),
    ("kirsch_scharr", &[FilterKind::Kirsch, FilterKind::Scharr]),
    (
        "gabor_phase_congruency",
        &[FilterKind::Gabor, FilterKind::PhaseCongruency],
    ),
    (
        "sobel_log_phase_congruency",
        &[FilterKind::Sobel, FilterKind::Log, FilterKind::PhaseCongruency],
    ),
    (
        "dog_phase_congruency_edge_flow",
        &[FilterKind::Dog, FilterKind::PhaseCongruency, FilterKind::EdgeFlow],
    ),
    (
        "prewitt_log_phase_congruency",
        &[FilterKind::Prewitt, FilterKind::Log, FilterKind::PhaseCongruency],
    ),
    (
        "sobel_kirsch_scharr",
        &[FilterKind::Sobel, FilterKind::Kirsch, FilterKind::Scharr],
    ),
    (
        "dog_phase_congruency_edge_flow_gabor",
        &[
            FilterKind::Dog,
            FilterKind::PhaseCongruency,
            FilterKind::EdgeFlow,
            FilterKind::Gabor,
        ],
    ),
    (
        "sobel_prewitt_log_phase_congruency",
        &[
            FilterKind::Sobel,
            FilterKind::Prewitt,
            FilterKind::Log,
            FilterKind::PhaseCongruency,
        ],
    ),
    (
        "scale_space_phase_congruency_dog_edge_flow",
        &[
            FilterKind::ScaleSpace,
            FilterKind::PhaseCongruency,
            FilterKind::Dog,
            FilterKind::EdgeFlow,
        ],
    ),
];

impl Filter {
    /// Looks up a combination from [`COMBINATION_PRESETS`].
    pub fn preset(name: &str) -> EdgeSketchResult<Filter> {
        let needle = name.trim();
        COMBINATION_PRESETS
            .iter()
            .find(|(preset, _)| *preset == needle)
            .map(|(_, kinds)| Filter::combination(kinds))
            .ok_or_else(|| EdgeSketchError::UnknownFilter {
                name: needle.to_string(),
            })
    }

    /// Resolves a preset name, an algorithm name or a `+`-joined list.
    pub fn from_name(name: &str) -> EdgeSketchResult<Filter> {
        Filter::preset(name).or_else(|_| Filter::parse(name))
    }
}

/// `255 - x` for every pixel.
pub fn invert(raster: &Raster) -> Raster {
    raster.map_pixels(|v| 255 - v)
}

/// Blurs an edge map with [`FINALIZE_SIGMA`] and inverts it.
pub fn finalize(raster: &Raster) -> EdgeSketchResult<Raster> {
    finalize_with(raster, false)
}

pub(crate) fn finalize_with(raster: &Raster, parallel: bool) -> EdgeSketchResult<Raster> {
    let _span = trace_span!("finalize_sketch", width = raster.width(), height = raster.height())
        .entered();
    let blurred = gaussian_blur_with(raster, FINALIZE_SIGMA, parallel)?;
    Ok(invert(&blurred))
}

/// Runs one filter (or combination) over the whole raster and finalizes it.
pub fn sketch_with(raster: &Raster, filter: &Filter) -> EdgeSketchResult<Raster> {
    sketch_with_par(raster, filter, false)
}

/// [`sketch_with`], optionally on the rayon pool.
pub fn sketch_with_par(raster: &Raster, filter: &Filter, parallel: bool) -> EdgeSketchResult<Raster> {
    let edges = filter.apply_with(raster, parallel)?;
    finalize_with(&edges, parallel)
}

/// Full adaptive pipeline with the default dispatcher configuration.
pub fn process_adaptive_regions(raster: &Raster) -> EdgeSketchResult<Raster> {
    AdaptiveRegionDispatcher::new().process(raster)
}

#[cfg(test)]
mod tests {
    use super::{finalize, invert, COMBINATION_PRESETS};
    use crate::filter::{Filter, FilterKind};
    use crate::image::Raster;

    #[test]
    fn presets_resolve_and_have_unique_names() {
        for (i, (name, kinds)) in COMBINATION_PRESETS.iter().enumerate() {
            let filter = Filter::from_name(name).unwrap();
            assert_eq!(filter, Filter::combination(kinds));
            assert!(COMBINATION_PRESETS[i + 1..].iter().all(|(other, _)| other != name));
        }
    }

    #[test]
    fn from_name_falls_back_to_algorithms() {
        assert_eq!(Filter::from_name("log").unwrap(), Filter::Log);
        assert_eq!(
            Filter::from_name("roberts+kirsch").unwrap(),
            Filter::combination(&[FilterKind::Roberts, FilterKind::Kirsch])
        );
        assert!(Filter::from_name("sobel_canny").is_err());
    }

    #[test]
    fn finalize_of_empty_edges_is_white() {
        let edges = Raster::filled(6, 6, 0).unwrap();
        let sketch = finalize(&edges).unwrap();
        assert!(sketch.data().iter().all(|&v| v == 255));
    }

    #[test]
    fn invert_maps_extremes() {
        let raster = Raster::new(vec![0, 128, 255], 3, 1).unwrap();
        assert_eq!(invert(&raster).data(), &[255, 127, 0]);
    }
}
