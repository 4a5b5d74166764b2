//! Gram window geometry and the ordering used to group identical windows
//!
//! A gram is the `G×G` block of a bitboard whose top-left pixel is its
//! anchor. Anchors are flat row-major pixel indices; an anchor is valid only
//! when its whole window fits inside the image.

use ndarray::{Array2, ArrayView2, Axis, Slice};
use std::cmp::Ordering;

/// Binarized image, one 0/1 byte per pixel, indexed `(row, col)`
pub type Bitboard = Array2<u8>;

/// View of a bitboard cut into gram windows of one size
#[derive(Debug, Clone, Copy)]
pub struct GramLayout<'a> {
    bitboard: ArrayView2<'a, u8>,
    gram_size: usize,
}

impl<'a> GramLayout<'a> {
    /// Create a layout over `bitboard` with `gram_size`-wide windows
    pub const fn new(bitboard: ArrayView2<'a, u8>, gram_size: usize) -> Self {
        Self {
            bitboard,
            gram_size,
        }
    }

    /// Edge length of every window
    pub const fn gram_size(&self) -> usize {
        self.gram_size
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.bitboard.ncols()
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.bitboard.nrows()
    }

    /// Number of pixels, which is also the number of anchors
    pub fn pixel_count(&self) -> usize {
        self.bitboard.len()
    }

    /// Row and column of a flat pixel index
    pub fn anchor(&self, index: usize) -> (usize, usize) {
        let width = self.width();
        (
            index.checked_div(width).unwrap_or(0),
            index.checked_rem(width).unwrap_or(0),
        )
    }

    /// Whether the window anchored at `index` lies fully inside the image
    pub fn is_valid_anchor(&self, index: usize) -> bool {
        if index >= self.pixel_count() {
            return false;
        }
        let (row, col) = self.anchor(index);
        row + self.gram_size <= self.height() && col + self.gram_size <= self.width()
    }

    /// Number of anchors whose window fits inside the image
    pub fn valid_anchor_count(&self) -> usize {
        let rows = (self.height() + 1).saturating_sub(self.gram_size);
        let cols = (self.width() + 1).saturating_sub(self.gram_size);
        if self.pixel_count() == 0 { 0 } else { rows * cols }
    }

    /// Window anchored at `index`, or `None` when it runs past an edge
    pub fn window(&self, index: usize) -> Option<ArrayView2<'a, u8>> {
        self.is_valid_anchor(index).then(|| {
            let (row, col) = self.anchor(index);
            self.bitboard
                .slice_axis_move(Axis(0), Slice::from(row..row + self.gram_size))
                .slice_axis_move(Axis(1), Slice::from(col..col + self.gram_size))
        })
    }

    /// Total order over anchors by window content
    ///
    /// Valid windows compare row-major, 0 before 1 at the first differing
    /// cell. Invalid anchors sort after every valid one and tie with each
    /// other.
    pub fn compare(&self, a: usize, b: usize) -> Ordering {
        match (self.window(a), self.window(b)) {
            (Some(left), Some(right)) => left.iter().cmp(right.iter()),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}
