//! Grayscale rasters, borrowed views and regions.
//!
//! `Raster` is the owned, contiguous, row-major `u8` buffer every filter
//! consumes and produces. It is never mutated after construction: each
//! transform allocates a fresh raster. `ImageView` is a borrowed 2D view with
//! an explicit stride; ROI views are zero-copy slices of the same buffer and
//! keep the parent stride, which is how blocks are cut out of a raster.

use crate::util::{EdgeSketchError, EdgeSketchResult};

pub mod convert;
#[cfg(feature = "image-io")]
pub mod io;
pub mod region;

pub use region::Region;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> EdgeSketchResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(
        data: &'a [T],
        width: usize,
        height: usize,
        stride: usize,
    ) -> EdgeSketchResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(EdgeSketchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the view width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the view height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy view of `region`.
    pub fn roi(&self, region: Region) -> EdgeSketchResult<ImageView<'a, T>> {
        region.check_within(self.width, self.height)?;
        let start = region.y * self.stride + region.x;
        let data = self
            .data
            .get(start..)
            .ok_or(EdgeSketchError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;
        ImageView::new(data, region.width, region.height, self.stride)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> EdgeSketchResult<usize> {
    if width == 0 || height == 0 {
        return Err(EdgeSketchError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(EdgeSketchError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(EdgeSketchError::InvalidDimensions { width, height })
}

/// Owned single-channel raster, row-major with origin at the top-left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Raster {
    /// Wraps a buffer holding exactly `width * height` pixels.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> EdgeSketchResult<Self> {
        let expected = pixel_count(width, height)?;
        if data.len() != expected {
            return Err(EdgeSketchError::BufferLengthMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a raster where every pixel equals `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> EdgeSketchResult<Self> {
        let len = pixel_count(width, height)?;
        Ok(Self {
            data: vec![value; len],
            width,
            height,
        })
    }

    /// Creates a raster by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> EdgeSketchResult<Self>
    where
        F: FnMut(usize, usize) -> u8,
    {
        let len = pixel_count(width, height)?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Copies a (possibly strided) view into a contiguous raster.
    pub fn from_view(view: ImageView<'_, u8>) -> EdgeSketchResult<Self> {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(pixel_count(width, height)?);
        for y in 0..height {
            let row = view.row(y).ok_or(EdgeSketchError::BufferTooSmall {
                needed: (y + 1) * view.stride(),
                got: view.data.len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::new(data, width, height)
    }

    /// Builds a raster from a buffer already known to match the dimensions.
    pub(crate) fn from_parts(data: Vec<u8>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            data,
            width,
            height,
        }
    }

    /// Returns the raster width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the raster height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the row-major pixel buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the raster and returns its pixel buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Returns a borrowed view of the whole raster.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the full-raster region.
    pub fn bounds(&self) -> Region {
        Region::new(0, 0, self.width, self.height)
    }

    /// Copies `region` into a new, independently owned raster.
    pub fn extract(&self, region: Region) -> EdgeSketchResult<Raster> {
        Raster::from_view(self.view().roi(region)?)
    }

    /// Errors unless `other` has the same dimensions as `self`.
    pub fn ensure_same_dimensions(&self, other: &Raster) -> EdgeSketchResult<()> {
        if self.dimensions() != other.dimensions() {
            return Err(EdgeSketchError::DimensionMismatch {
                expected_width: self.width,
                expected_height: self.height,
                got_width: other.width,
                got_height: other.height,
            });
        }
        Ok(())
    }

    /// Applies `f` to every pixel, producing a new raster.
    pub fn map_pixels<F>(&self, f: F) -> Raster
    where
        F: Fn(u8) -> u8,
    {
        let data = self.data.iter().map(|&v| f(v)).collect();
        Raster::from_parts(data, self.width, self.height)
    }
}

fn pixel_count(width: usize, height: usize) -> EdgeSketchResult<usize> {
    if width == 0 || height == 0 {
        return Err(EdgeSketchError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(EdgeSketchError::InvalidDimensions { width, height })
}
