//! Image analysis stages of the synthesis pipeline

/// Brightness computation and median binarization
pub mod brightness;
/// Gram grouping, recurrence counting and the rarity map
pub mod grams;
/// Per-job pipeline and the pool executor driving it
pub mod synthesis;
