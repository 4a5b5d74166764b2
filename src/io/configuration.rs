//! Synthesis constants and runtime configuration defaults

// Block-recurrence model settings
/// Edge length of the square gram windows
pub const DEFAULT_GRAM_SIZE: usize = 6;

/// Number of worker threads draining the job list
pub const DEFAULT_THREAD_COUNT: usize = 6;

// Safety limit to prevent absurd windows from being requested on the command line
/// Maximum allowed gram edge length
pub const MAX_GRAM_SIZE: usize = 64;

// File naming
/// Extension of source images inside the source directory
pub const IMAGE_EXTENSION: &str = "ppm";
/// Only maximal sample value accepted in source image headers
pub const PPM_MAX_SAMPLE: u32 = 255;
/// Extension of synthesized artifacts inside the destination directory
pub const ARTIFACT_EXTENSION: &str = "bin";
/// Suffix of the rendered recurrence map preview
pub const MAP_PREVIEW_SUFFIX: &str = "_map";
/// Suffix of the rendered binarized image preview
pub const BITBOARD_PREVIEW_SUFFIX: &str = "_bw";
/// Extension of rendered previews
pub const PREVIEW_EXTENSION: &str = "png";

// Progress bar display settings
/// Largest worker count that still gets one status line per worker
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 8;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
