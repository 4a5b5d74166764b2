//! Parallel extraction of binary texture gram statistics from RGB images
//!
//! Each image is binarized around its median brightness, every square window
//! of the result is grouped with its identical siblings, and the distinct
//! windows are written with their recurrence counts and a per-pixel rarity
//! map. A fixed pool of workers drains the job list and stops claiming work
//! at the first failure.

#![forbid(unsafe_code)]

/// Buffer management, order statistics and the worker pool
pub mod algorithm;
/// Binarization, gram extraction and the per-job pipeline
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Numeric comparison helpers
pub mod math;
/// Gram window geometry over binarized images
pub mod spatial;

pub use io::error::{Result, SynthesisError};
