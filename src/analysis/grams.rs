//! Gram extraction: distinct windows, their recurrences and the rarity map

use crate::algorithm::buffer::GrowableBuffer;
use crate::algorithm::order::sort_by;
use crate::io::error::{Result, invalid_parameter};
use crate::math::comparison::inverse_frequency;
use crate::spatial::{Bitboard, GramLayout};
use ndarray::Array2;

/// Distinct gram windows of one bitboard with their recurrence statistics
///
/// Patterns are stored back to back, `gram_size²` bytes each, in the order
/// they are first met while walking anchors sorted by window content.
#[derive(Debug, Clone, PartialEq)]
pub struct GramStatistics {
    gram_size: usize,
    patterns: Vec<u8>,
    recurrences: Vec<u32>,
    recurrence_map: Array2<f32>,
    bitboard: Bitboard,
}

impl GramStatistics {
    /// Group identical windows of `bitboard` and count their recurrences
    ///
    /// Every anchor is sorted by window content, so equal windows become
    /// adjacent and invalid anchors collect at the end. Each run of equal
    /// windows yields one pattern whose recurrence is the run length; its
    /// anchors receive `1 / run_length` in the recurrence map. Pixels whose
    /// window runs past an edge keep 0.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `gram_size` is zero (`InvalidParameter`)
    /// - The pattern buffer cannot grow (`OutOfMemory`)
    pub fn extract(bitboard: Bitboard, gram_size: usize) -> Result<Self> {
        if gram_size == 0 {
            return Err(invalid_parameter(
                "gram_size",
                &gram_size,
                &"must be at least 1",
            ));
        }

        let layout = GramLayout::new(bitboard.view(), gram_size);
        let pixel_count = layout.pixel_count();
        let pattern_len = gram_size * gram_size;

        let mut indices: Vec<usize> = (0..pixel_count).collect();
        sort_by(&mut indices, |&a, &b| layout.compare(a, b));

        let mut buffer = GrowableBuffer::new();
        let mut recurrences = Vec::new();
        let mut recurrence_map = Array2::<f32>::zeros(bitboard.dim());

        let mut start = 0;
        while let Some(&anchor) = indices.get(start) {
            // Invalid anchors sort last, so the first one ends the walk
            let Some(window) = layout.window(anchor) else {
                break;
            };

            let offset = recurrences.len() * pattern_len;
            for (row_index, row) in window.rows().into_iter().enumerate() {
                let row_bytes: Vec<u8> = row.iter().copied().collect();
                buffer.write(&row_bytes, offset + row_index * gram_size)?;
            }

            let run_len = indices
                .get(start..)
                .unwrap_or_default()
                .iter()
                .take_while(|&&other| layout.compare(anchor, other).is_eq())
                .count();
            let count = u32::try_from(run_len).unwrap_or(u32::MAX);
            let weight = inverse_frequency::<f32>(count);

            for &member in indices.get(start..start + run_len).unwrap_or_default() {
                let (row, col) = layout.anchor(member);
                if let Some(cell) = recurrence_map.get_mut((row, col)) {
                    *cell = weight;
                }
            }

            recurrences.push(count);
            start += run_len;
        }

        let mut patterns = buffer.take();
        patterns.truncate(recurrences.len() * pattern_len);
        buffer.release();

        Ok(Self {
            gram_size,
            patterns,
            recurrences,
            recurrence_map,
            bitboard,
        })
    }

    /// Assemble statistics from already computed parts
    ///
    /// Used when decoding artifacts; no consistency checks beyond what the
    /// decoder performs.
    pub const fn from_parts(
        gram_size: usize,
        patterns: Vec<u8>,
        recurrences: Vec<u32>,
        recurrence_map: Array2<f32>,
        bitboard: Bitboard,
    ) -> Self {
        Self {
            gram_size,
            patterns,
            recurrences,
            recurrence_map,
            bitboard,
        }
    }

    /// Edge length of every pattern
    pub const fn gram_size(&self) -> usize {
        self.gram_size
    }

    /// Number of distinct patterns
    pub const fn pattern_count(&self) -> usize {
        self.recurrences.len()
    }

    /// All pattern bytes, back to back
    pub fn patterns(&self) -> &[u8] {
        &self.patterns
    }

    /// Bytes of pattern `index` in row-major order
    pub fn pattern(&self, index: usize) -> Option<&[u8]> {
        let pattern_len = self.gram_size * self.gram_size;
        let start = index.checked_mul(pattern_len)?;
        self.patterns.get(start..start + pattern_len)
    }

    /// Recurrence count of each pattern, in pattern order
    pub fn recurrences(&self) -> &[u32] {
        &self.recurrences
    }

    /// Per-pixel `1 / recurrence` of the pixel's window, 0 where invalid
    pub const fn recurrence_map(&self) -> &Array2<f32> {
        &self.recurrence_map
    }

    /// Binarized image the statistics were computed from
    pub const fn bitboard(&self) -> &Bitboard {
        &self.bitboard
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.bitboard.ncols()
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.bitboard.nrows()
    }

    /// Total recurrences, which equals the number of valid anchors
    pub fn total_recurrences(&self) -> u64 {
        self.recurrences.iter().map(|&count| u64::from(count)).sum()
    }
}
