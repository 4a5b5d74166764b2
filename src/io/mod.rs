/// Binary artifact encoding and decoding
pub mod artifact;
/// Command-line parsing and batch orchestration
pub mod cli;
/// Compile-time defaults and file naming
pub mod configuration;
/// Error types and context helpers
pub mod error;
/// PPM input and PNG preview output
pub mod image;
/// Job-list parsing
pub mod joblist;
/// Terminal progress display
pub mod progress;
