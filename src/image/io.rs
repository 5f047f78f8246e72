//! Convenience helpers for loading and saving images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Color input goes through
//! the same luma weights as [`crate::image::convert`]; output replicates the
//! gray value into three channels before encoding.

use crate::image::convert::{gray_from_rgb, gray_to_rgb};
use crate::image::Raster;
use crate::util::{EdgeSketchError, EdgeSketchResult};
use std::path::Path;

/// Creates a raster from a decoded image of any color type.
pub fn raster_from_dynamic_image(img: &image::DynamicImage) -> EdgeSketchResult<Raster> {
    let rgb = img.to_rgb8();
    gray_from_rgb(rgb.as_raw(), rgb.width() as usize, rgb.height() as usize)
}

/// Creates a raster from an 8-bit grayscale image buffer.
pub fn raster_from_gray_image(img: &image::GrayImage) -> EdgeSketchResult<Raster> {
    Raster::new(
        img.as_raw().clone(),
        img.width() as usize,
        img.height() as usize,
    )
}

/// Expands a raster into an RGB image buffer.
pub fn raster_to_rgb_image(raster: &Raster) -> EdgeSketchResult<image::RgbImage> {
    let width = u32::try_from(raster.width()).map_err(|_| EdgeSketchError::InvalidDimensions {
        width: raster.width(),
        height: raster.height(),
    })?;
    let height =
        u32::try_from(raster.height()).map_err(|_| EdgeSketchError::InvalidDimensions {
            width: raster.width(),
            height: raster.height(),
        })?;
    image::RgbImage::from_raw(width, height, gray_to_rgb(raster)).ok_or(
        EdgeSketchError::BufferLengthMismatch {
            expected: raster.width() * raster.height() * 3,
            got: raster.data().len() * 3,
        },
    )
}

/// Loads an image from disk and converts it to a grayscale raster.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> EdgeSketchResult<Raster> {
    let img = image::open(path).map_err(|err| EdgeSketchError::ImageIo {
        reason: err.to_string(),
    })?;
    raster_from_dynamic_image(&img)
}

/// Saves a raster as a 3-channel image; the format follows the file extension.
pub fn save_gray_image<P: AsRef<Path>>(raster: &Raster, path: P) -> EdgeSketchResult<()> {
    let rgb = raster_to_rgb_image(raster)?;
    rgb.save(path).map_err(|err| EdgeSketchError::ImageIo {
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{raster_from_dynamic_image, raster_to_rgb_image};
    use crate::image::Raster;

    #[test]
    fn dynamic_image_round_trips_gray_values() {
        let raster = Raster::from_fn(3, 2, |x, y| (x * 40 + y * 100) as u8).unwrap();
        let rgb = raster_to_rgb_image(&raster).unwrap();
        let back = raster_from_dynamic_image(&image::DynamicImage::ImageRgb8(rgb)).unwrap();
        for (a, b) in raster.data().iter().zip(back.data()) {
            assert!(a.abs_diff(*b) <= 1);
        }
    }
}
