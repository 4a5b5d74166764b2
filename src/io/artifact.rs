//! Binary artifact layout for gram statistics
//!
//! All integers are 32-bit signed and all floats 32-bit IEEE, little-endian,
//! in this order:
//!
//! 1. gram size
//! 2. pattern count
//! 3. pattern bytes (`count * size * size`, each 0 or 1)
//! 4. recurrence per pattern (`count` integers)
//! 5. width, height
//! 6. recurrence map (`width * height` floats, row-major)
//! 7. bitboard (`width * height` bytes, row-major)

use crate::analysis::grams::GramStatistics;
use crate::io::error::{Result, SynthesisError, WithContext, artifact_format};
use ndarray::Array2;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

fn to_i32(value: usize, field: &'static str) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_overflow| artifact_format(&format!("{field} {value} exceeds i32")))
}

fn write_i32<W: Write>(writer: &mut W, value: i32) -> std::io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Serialize statistics into `writer`
///
/// # Errors
///
/// Returns an error if:
/// - A size does not fit the 32-bit layout (`ArtifactFormat`)
/// - The writer fails (`FileSystem`)
pub fn write_artifact<W: Write>(statistics: &GramStatistics, writer: &mut W) -> Result<()> {
    let gram_size = to_i32(statistics.gram_size(), "gram size")?;
    let pattern_count = to_i32(statistics.pattern_count(), "pattern count")?;
    let width = to_i32(statistics.width(), "width")?;
    let height = to_i32(statistics.height(), "height")?;
    let recurrences = statistics
        .recurrences()
        .iter()
        .map(|&count| to_i32(count as usize, "recurrence"))
        .collect::<Result<Vec<i32>>>()?;

    write_i32(writer, gram_size)?;
    write_i32(writer, pattern_count)?;
    writer.write_all(statistics.patterns())?;
    for count in recurrences {
        write_i32(writer, count)?;
    }

    write_i32(writer, width)?;
    write_i32(writer, height)?;
    for &value in statistics.recurrence_map() {
        writer.write_all(&value.to_le_bytes())?;
    }
    let bitboard: Vec<u8> = statistics.bitboard().iter().copied().collect();
    writer.write_all(&bitboard)?;
    writer.flush()?;
    Ok(())
}

/// Write statistics to `path`
///
/// A file left behind by a failed write is not removed.
///
/// # Errors
///
/// Returns an error if:
/// - The destination directory does not exist (`OutputNotFound`)
/// - The file cannot be created or written (`FileSystem`)
/// - A size does not fit the 32-bit layout (`ArtifactFormat`)
pub fn save_artifact(statistics: &GramStatistics, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            SynthesisError::OutputNotFound {
                path: path.to_path_buf(),
                source,
            }
        } else {
            SynthesisError::FileSystem {
                path: path.to_path_buf(),
                operation: "create artifact",
                source,
            }
        }
    })?;
    let mut writer = BufWriter::new(file);
    write_artifact(statistics, &mut writer).with_path(path, "write artifact")
}

fn read_exact_or<R: Read>(reader: &mut R, bytes: &mut [u8], field: &'static str) -> Result<()> {
    reader.read_exact(bytes).map_err(|error| {
        if error.kind() == ErrorKind::UnexpectedEof {
            artifact_format(&format!("truncated while reading {field}"))
        } else {
            SynthesisError::from(error)
        }
    })
}

fn read_i32<R: Read>(reader: &mut R, field: &'static str) -> Result<i32> {
    let mut word = [0u8; 4];
    read_exact_or(reader, &mut word, field)?;
    Ok(i32::from_le_bytes(word))
}

fn read_size<R: Read>(reader: &mut R, field: &'static str) -> Result<usize> {
    let value = read_i32(reader, field)?;
    usize::try_from(value)
        .map_err(|_negative| artifact_format(&format!("negative {field} {value}")))
}

// Reads through `take` so a corrupt length cannot trigger a huge allocation up front
fn read_bytes<R: Read>(reader: &mut R, len: usize, field: &'static str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let limit = u64::try_from(len).unwrap_or(u64::MAX);
    reader.by_ref().take(limit).read_to_end(&mut bytes)?;
    if bytes.len() == len {
        Ok(bytes)
    } else {
        Err(artifact_format(&format!(
            "truncated while reading {field}: {} of {len} bytes",
            bytes.len()
        )))
    }
}

fn checked_len(factors: &[usize], field: &'static str) -> Result<usize> {
    factors
        .iter()
        .try_fold(1usize, |acc, &factor| acc.checked_mul(factor))
        .ok_or_else(|| artifact_format(&format!("{field} length overflows")))
}

fn ensure_binary(bytes: &[u8], field: &'static str) -> Result<()> {
    match bytes.iter().position(|&byte| byte > 1) {
        Some(position) => Err(artifact_format(&format!(
            "{field} byte {position} is not 0 or 1"
        ))),
        None => Ok(()),
    }
}

/// Decode statistics from `reader`
///
/// # Errors
///
/// Returns `ArtifactFormat` if a size is negative, the data is truncated or
/// binary fields hold values other than 0 and 1, and `FileSystem` if the
/// reader fails
pub fn read_artifact<R: Read>(reader: &mut R) -> Result<GramStatistics> {
    let gram_size = read_size(reader, "gram size")?;
    let pattern_count = read_size(reader, "pattern count")?;

    let pattern_len = checked_len(&[pattern_count, gram_size, gram_size], "patterns")?;
    let patterns = read_bytes(reader, pattern_len, "patterns")?;
    ensure_binary(&patterns, "pattern")?;

    let recurrence_bytes = read_bytes(
        reader,
        checked_len(&[pattern_count, 4], "recurrences")?,
        "recurrences",
    )?;
    let mut recurrences = Vec::with_capacity(pattern_count);
    for chunk in recurrence_bytes.chunks_exact(4) {
        let mut word = [0u8; 4];
        word.copy_from_slice(chunk);
        let count = i32::from_le_bytes(word);
        recurrences.push(
            u32::try_from(count)
                .map_err(|_negative| artifact_format(&format!("negative recurrence {count}")))?,
        );
    }

    let width = read_size(reader, "width")?;
    let height = read_size(reader, "height")?;
    let pixel_count = checked_len(&[width, height], "pixels")?;

    let map_bytes = read_bytes(
        reader,
        checked_len(&[pixel_count, 4], "recurrence map")?,
        "recurrence map",
    )?;
    let mut map_values = Vec::with_capacity(pixel_count);
    for chunk in map_bytes.chunks_exact(4) {
        let mut word = [0u8; 4];
        word.copy_from_slice(chunk);
        map_values.push(f32::from_le_bytes(word));
    }
    let recurrence_map = Array2::from_shape_vec((height, width), map_values)
        .map_err(|error| artifact_format(&error))?;

    let bitboard_bytes = read_bytes(reader, pixel_count, "bitboard")?;
    ensure_binary(&bitboard_bytes, "bitboard")?;
    let bitboard = Array2::from_shape_vec((height, width), bitboard_bytes)
        .map_err(|error| artifact_format(&error))?;

    Ok(GramStatistics::from_parts(
        gram_size,
        patterns,
        recurrences,
        recurrence_map,
        bitboard,
    ))
}

/// Load statistics from the artifact at `path`
///
/// # Errors
///
/// Returns `FileSystem` if the file cannot be opened and the errors of
/// [`read_artifact`] otherwise
pub fn load_artifact(path: &Path) -> Result<GramStatistics> {
    let file = File::open(path).with_path(path, "open artifact")?;
    read_artifact(&mut BufReader::new(file)).with_path(path, "read artifact")
}
