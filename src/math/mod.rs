//! Mathematical utilities for the synthesis pipeline

/// Three-way float comparison and frequency helpers
pub mod comparison;
