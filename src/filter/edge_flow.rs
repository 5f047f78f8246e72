//! Gradient-direction non-maximum suppression ("edge flow").

use crate::image::Raster;
use crate::util::math::clamp_to_u8;

/// Sobel gradients as `f64`; the one-pixel border stays 0.
fn sobel_gradients(raster: &Raster) -> (Vec<f64>, Vec<f64>) {
    let (width, height) = raster.dimensions();
    let src = raster.data();
    let mut gx = vec![0.0f64; width * height];
    let mut gy = vec![0.0f64; width * height];
    let px = |x: usize, y: usize| f64::from(src[y * width + x]);
    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let idx = y * width + x;
            gx[idx] = -px(x - 1, y - 1) + px(x + 1, y - 1) - 2.0 * px(x - 1, y)
                + 2.0 * px(x + 1, y)
                - px(x - 1, y + 1)
                + px(x + 1, y + 1);
            gy[idx] = -px(x - 1, y - 1) - 2.0 * px(x, y - 1) - px(x + 1, y - 1)
                + px(x - 1, y + 1)
                + 2.0 * px(x, y + 1)
                + px(x + 1, y + 1);
        }
    }
    (gx, gy)
}

/// Keeps a pixel's gradient magnitude only where it is a local maximum along
/// its quantized gradient direction; everything else becomes 0.
///
/// The step along each axis is +1 for a strictly positive gradient component
/// and -1 otherwise. Neighbours outside the raster count as magnitude 0.
pub fn edge_flow(raster: &Raster) -> Raster {
    let (width, height) = raster.dimensions();
    let (gx, gy) = sobel_gradients(raster);
    let magnitude = |x: isize, y: isize| -> f64 {
        if x < 0 || y < 0 || x >= width as isize || y >= height as isize {
            return 0.0;
        }
        let idx = y as usize * width + x as usize;
        (gx[idx] * gx[idx] + gy[idx] * gy[idx]).sqrt()
    };

    let mut out = vec![0u8; width * height];
    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let idx = y * width + x;
            let (xi, yi) = (x as isize, y as isize);
            let own = magnitude(xi, yi);
            let step_x = if gx[idx] > 0.0 { 1 } else { -1 };
            let step_y = if gy[idx] > 0.0 { 1 } else { -1 };
            let ahead = magnitude(xi + step_x, yi + step_y);
            let behind = magnitude(xi - step_x, yi - step_y);
            if own >= ahead && own >= behind {
                out[idx] = clamp_to_u8(own);
            }
        }
    }
    Raster::from_parts(out, width, height)
}

#[cfg(test)]
mod tests {
    use super::edge_flow;
    use crate::image::Raster;

    #[test]
    fn thin_ridge_survives_suppression() {
        // Smooth ramp across columns 3..=5 produces a peak gradient at x = 4.
        let values = [0u8, 0, 0, 10, 60, 110, 120, 120, 120];
        let raster = Raster::from_fn(9, 7, |x, _| values[x]).unwrap();
        let out = edge_flow(&raster);
        let row: Vec<u8> = (0..9).map(|x| out.get(x, 3).unwrap()).collect();
        let peak = row.iter().enumerate().max_by_key(|(_, v)| **v).map(|(i, _)| i);
        assert_eq!(peak, Some(4));
        assert!(row[4] > 0);
    }

    #[test]
    fn flat_raster_is_suppressed_to_zero() {
        let raster = Raster::filled(6, 6, 200).unwrap();
        assert!(edge_flow(&raster).data().iter().all(|&v| v == 0));
    }
}
