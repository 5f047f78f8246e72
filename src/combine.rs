//! Per-pixel averaging of edge maps.
//!
//! `combine(a, b)` is `(a + b) / 2` with integer truncation. Because of the
//! truncation, folding more than two maps is order-dependent; `combine_all`
//! always folds left to right: `combine(combine(combine(a, b), c), d)`.

use crate::image::Raster;
use crate::util::{EdgeSketchError, EdgeSketchResult};

/// Averages two rasters of identical dimensions.
pub fn combine(a: &Raster, b: &Raster) -> EdgeSketchResult<Raster> {
    a.ensure_same_dimensions(b)?;
    let data = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(&x, &y)| ((u16::from(x) + u16::from(y)) / 2) as u8)
        .collect();
    Ok(Raster::from_parts(data, a.width(), a.height()))
}

/// Folds `rasters` left to right through [`combine`].
///
/// A single raster is returned unchanged; an empty slice is an error.
pub fn combine_all(rasters: &[Raster]) -> EdgeSketchResult<Raster> {
    let (first, rest) = rasters
        .split_first()
        .ok_or(EdgeSketchError::InvalidInput("nothing to combine"))?;
    for raster in rest {
        first.ensure_same_dimensions(raster)?;
    }
    let mut acc = first.clone();
    for raster in rest {
        acc = combine(&acc, raster)?;
    }
    Ok(acc)
}
