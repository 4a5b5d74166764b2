//! Brightness computation and median thresholding of RGB images

use crate::algorithm::order::select_by;
use crate::io::error::{Result, SynthesisError};
use crate::math::comparison::compare_floats;
use crate::spatial::Bitboard;
use ndarray::{Array2, Array3, Axis};
use std::path::PathBuf;

/// Lightness of one pixel: mean of its darkest and brightest channel in `[0, 1]`
pub fn pixel_brightness(channels: &[u8]) -> f32 {
    let min = channels.iter().copied().min().unwrap_or(0);
    let max = channels.iter().copied().max().unwrap_or(0);
    (f32::from(min) / 255.0 + f32::from(max) / 255.0) / 2.0
}

/// Per-pixel brightness of an image indexed `(row, col, channel)`
pub fn brightness(image: &Array3<u8>) -> Array2<f32> {
    image.map_axis(Axis(2), |pixel| match pixel.as_slice() {
        Some(channels) => pixel_brightness(channels),
        None => pixel_brightness(&pixel.to_vec()),
    })
}

/// Brightness at sorted position `len / 2`, computed on a copy
///
/// Returns `None` for an empty array.
pub fn median_brightness(brightness: &Array2<f32>) -> Option<f32> {
    let mut values: Vec<f32> = brightness.iter().copied().collect();
    let middle = values.len() / 2;
    select_by(&mut values, middle, compare_floats).copied()
}

/// Threshold brightness at `median`: 1 when `>= median`, else 0
pub fn threshold(brightness: &Array2<f32>, median: f32) -> Bitboard {
    brightness.mapv(|value| u8::from(value >= median))
}

/// Binarize an RGB image around its median brightness
///
/// # Errors
///
/// Returns `MalformedImageHeader` if the image has no pixels
pub fn binarize(image: &Array3<u8>) -> Result<Bitboard> {
    let brightness = brightness(image);
    let median =
        median_brightness(&brightness).ok_or_else(|| SynthesisError::MalformedImageHeader {
            path: PathBuf::from("<memory>"),
            reason: "image has no pixels".to_string(),
        })?;
    Ok(threshold(&brightness, median))
}
