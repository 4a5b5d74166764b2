//! Spatial data structures over binarized images
//!
//! This module contains the gram window geometry: anchor validity, window
//! extraction and the content ordering used to group identical windows.

/// Gram window geometry and ordering
pub mod window;

pub use window::{Bitboard, GramLayout};
