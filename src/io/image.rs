//! Fixed-header RGB image input and grayscale preview export

use crate::io::configuration::PPM_MAX_SAMPLE;
use crate::io::error::{Result, SynthesisError, out_of_memory};
use image::codecs::pnm::{PnmDecoder, PnmSubtype, SampleEncoding};
use image::{GrayImage, ImageError, Luma};
use ndarray::{Array2, Array3};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

/// Number of interleaved samples per pixel in decoded images
pub const CHANNELS: usize = 3;

/// Read a binary RGB image into an array indexed `(row, col, channel)`
///
/// Only the binary pixmap form (`P6`) with a maximal sample of
/// `PPM_MAX_SAMPLE` is accepted; samples are stored as read, never rescaled.
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist (`InputNotFound`) or cannot be opened
/// - The header cannot be parsed, is not a binary pixmap, has another
///   maximal sample or announces no pixels (`MalformedImageHeader`)
/// - The pixel buffer cannot be allocated (`OutOfMemory`)
/// - The file holds fewer sample bytes than announced (`PixelReadTruncated`)
pub fn read_rgb_image(path: &Path) -> Result<Array3<u8>> {
    let file = File::open(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            SynthesisError::InputNotFound {
                path: path.to_path_buf(),
                source,
            }
        } else {
            SynthesisError::FileSystem {
                path: path.to_path_buf(),
                operation: "open image",
                source,
            }
        }
    })?;

    let malformed = |reason: String| SynthesisError::MalformedImageHeader {
        path: path.to_path_buf(),
        reason,
    };

    let decoder =
        PnmDecoder::new(BufReader::new(file)).map_err(|error| malformed(error.to_string()))?;
    let (mut reader, header) = decoder.into_inner();

    let subtype = header.subtype();
    if !matches!(subtype, PnmSubtype::Pixmap(SampleEncoding::Binary)) {
        return Err(malformed(format!(
            "expected a binary RGB pixmap (P6), found {subtype:?}"
        )));
    }

    let max_sample = header.maximal_sample();
    if max_sample != PPM_MAX_SAMPLE {
        return Err(malformed(format!(
            "expected maximal sample {PPM_MAX_SAMPLE}, found {max_sample}"
        )));
    }

    let (width, height) = (header.width() as usize, header.height() as usize);
    if width == 0 || height == 0 {
        return Err(malformed(format!("image has no pixels ({width}x{height})")));
    }

    let sample_count = width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(CHANNELS))
        .ok_or_else(|| out_of_memory("pixel buffer", usize::MAX))?;
    let mut samples = Vec::new();
    if samples.try_reserve_exact(sample_count).is_err() {
        return Err(out_of_memory("pixel buffer", sample_count));
    }
    samples.resize(sample_count, 0);

    reader
        .read_exact(&mut samples)
        .map_err(|source| SynthesisError::PixelReadTruncated {
            path: path.to_path_buf(),
            expected_bytes: sample_count as u64,
            source: ImageError::IoError(source),
        })?;

    Array3::from_shape_vec((height, width, CHANNELS), samples)
        .map_err(|error| malformed(error.to_string()))
}

/// Convert a `[0, 1]` recurrence map into grey levels (`value * 255`)
pub fn recurrence_map_to_image(recurrence_map: &Array2<f32>) -> GrayImage {
    let (height, width) = recurrence_map.dim();
    let mut img = GrayImage::new(width as u32, height as u32);
    for ((row, col), &value) in recurrence_map.indexed_iter() {
        let level = (value.clamp(0.0, 1.0) * 255.0) as u8;
        img.put_pixel(col as u32, row as u32, Luma([level]));
    }
    img
}

/// Convert a bitboard into a black and white image (1 is white)
pub fn bitboard_to_image(bitboard: &Array2<u8>) -> GrayImage {
    let (height, width) = bitboard.dim();
    let mut img = GrayImage::new(width as u32, height as u32);
    for ((row, col), &bit) in bitboard.indexed_iter() {
        let level = if bit == 0 { 0 } else { u8::MAX };
        img.put_pixel(col as u32, row as u32, Luma([level]));
    }
    img
}

/// Save a grayscale preview, creating its directory if needed
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or saved to the specified path
pub fn export_preview(img: &GrayImage, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SynthesisError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path)
        .map_err(|e| SynthesisError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
