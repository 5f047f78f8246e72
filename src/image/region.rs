//! Rectangular regions and block grids.

use crate::util::{EdgeSketchError, EdgeSketchResult};

/// Axis-aligned rectangle in raster coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    /// Left column.
    pub x: usize,
    /// Top row.
    pub y: usize,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl Region {
    /// Creates a region without validating it against any raster.
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of pixels covered.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Exclusive right edge.
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    /// Errors unless the region is non-empty and lies inside `img_width x img_height`.
    pub fn check_within(&self, img_width: usize, img_height: usize) -> EdgeSketchResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EdgeSketchError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let end_x = self.x.checked_add(self.width);
        let end_y = self.y.checked_add(self.height);
        match (end_x, end_y) {
            (Some(end_x), Some(end_y)) if end_x <= img_width && end_y <= img_height => Ok(()),
            _ => Err(EdgeSketchError::RegionOutOfBounds {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
                img_width,
                img_height,
            }),
        }
    }
}

/// Splits `width x height` into row-major blocks of `block_size`, clipping
/// the last column and row of blocks to the raster bounds.
pub fn block_grid(width: usize, height: usize, block_size: usize) -> EdgeSketchResult<Vec<Region>> {
    if width == 0 || height == 0 {
        return Err(EdgeSketchError::InvalidDimensions { width, height });
    }
    if block_size == 0 {
        return Err(EdgeSketchError::InvalidParameter {
            name: "block_size",
            value: 0.0,
        });
    }
    let cols = width.div_ceil(block_size);
    let rows = height.div_ceil(block_size);
    let mut regions = Vec::with_capacity(cols * rows);
    for y in (0..height).step_by(block_size) {
        for x in (0..width).step_by(block_size) {
            regions.push(Region::new(
                x,
                y,
                block_size.min(width - x),
                block_size.min(height - y),
            ));
        }
    }
    Ok(regions)
}

#[cfg(test)]
mod tests {
    use super::{block_grid, Region};

    #[test]
    fn block_grid_clips_edge_blocks() {
        let blocks = block_grid(70, 40, 32).unwrap();
        assert_eq!(blocks.len(), 6);
        assert_eq!(blocks[2], Region::new(64, 0, 6, 32));
        assert_eq!(blocks[5], Region::new(64, 32, 6, 8));
        let covered: usize = blocks.iter().map(Region::area).sum();
        assert_eq!(covered, 70 * 40);
    }

    #[test]
    fn region_bounds_are_checked() {
        assert!(Region::new(0, 0, 4, 4).check_within(4, 4).is_ok());
        assert!(Region::new(1, 0, 4, 4).check_within(4, 4).is_err());
        assert!(Region::new(0, 0, 0, 4).check_within(4, 4).is_err());
        assert!(Region::new(usize::MAX, 0, 2, 1).check_within(4, 4).is_err());
    }
}
