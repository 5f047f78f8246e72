//! Conversion between interleaved 3-channel buffers and `Raster`.
//!
//! Luma uses the Rec.601 weights `0.299 R + 0.587 G + 0.114 B`, evaluated
//! blue-first in `f64` and truncated. Buffers are tightly packed (3 bytes per
//! pixel, no row padding).

use crate::image::Raster;
use crate::util::{EdgeSketchError, EdgeSketchResult};

const WEIGHT_B: f64 = 0.114;
const WEIGHT_G: f64 = 0.587;
const WEIGHT_R: f64 = 0.299;

#[inline]
fn luma(b: u8, g: u8, r: u8) -> u8 {
    (f64::from(b) * WEIGHT_B + f64::from(g) * WEIGHT_G + f64::from(r) * WEIGHT_R) as u8
}

fn check_interleaved(len: usize, width: usize, height: usize) -> EdgeSketchResult<()> {
    if width == 0 || height == 0 {
        return Err(EdgeSketchError::InvalidDimensions { width, height });
    }
    let expected = width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(3))
        .ok_or(EdgeSketchError::InvalidDimensions { width, height })?;
    if len != expected {
        return Err(EdgeSketchError::BufferLengthMismatch { expected, got: len });
    }
    Ok(())
}

/// Converts a packed B,G,R buffer into a grayscale raster.
pub fn gray_from_bgr(data: &[u8], width: usize, height: usize) -> EdgeSketchResult<Raster> {
    check_interleaved(data.len(), width, height)?;
    let pixels = data
        .chunks_exact(3)
        .map(|px| luma(px[0], px[1], px[2]))
        .collect();
    Ok(Raster::from_parts(pixels, width, height))
}

/// Converts a packed R,G,B buffer into a grayscale raster.
pub fn gray_from_rgb(data: &[u8], width: usize, height: usize) -> EdgeSketchResult<Raster> {
    check_interleaved(data.len(), width, height)?;
    let pixels = data
        .chunks_exact(3)
        .map(|px| luma(px[2], px[1], px[0]))
        .collect();
    Ok(Raster::from_parts(pixels, width, height))
}

/// Expands a raster into a packed 3-channel buffer by replicating each value.
pub fn gray_to_rgb(raster: &Raster) -> Vec<u8> {
    raster.data().iter().flat_map(|&v| [v, v, v]).collect()
}

#[cfg(test)]
mod tests {
    use super::{gray_from_bgr, gray_from_rgb, gray_to_rgb};
    use crate::image::Raster;

    #[test]
    fn channel_order_selects_weights() {
        let red_rgb = [255u8, 0, 0];
        let red_bgr = [0u8, 0, 255];
        let a = gray_from_rgb(&red_rgb, 1, 1).unwrap();
        let b = gray_from_bgr(&red_bgr, 1, 1).unwrap();
        assert_eq!(a.data(), &[76]);
        assert_eq!(a, b);
    }

    #[test]
    fn white_stays_white() {
        let white = [255u8; 6];
        let gray = gray_from_rgb(&white, 2, 1).unwrap();
        assert!(gray.data().iter().all(|&v| v >= 254));
    }

    #[test]
    fn rejects_short_buffer() {
        assert!(gray_from_rgb(&[0u8; 5], 2, 1).is_err());
    }

    #[test]
    fn gray_to_rgb_replicates() {
        let raster = Raster::new(vec![7, 200], 2, 1).unwrap();
        assert_eq!(gray_to_rgb(&raster), vec![7, 7, 7, 200, 200, 200]);
    }
}
