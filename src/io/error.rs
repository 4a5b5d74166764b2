//! Error types and context management for synthesis operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for every synthesis operation
///
/// All job-level variants are local to the job that raised them; the worker
/// pool turns any of them into a batch abort.
#[derive(Debug)]
pub enum SynthesisError {
    /// Source image could not be opened because it does not exist
    InputNotFound {
        /// Path of the missing image
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Image header could not be parsed or describes an unsupported image
    MalformedImageHeader {
        /// Path of the offending image
        path: PathBuf,
        /// Description of what is wrong with the header
        reason: String,
    },

    /// Fewer pixel bytes than announced by the header
    PixelReadTruncated {
        /// Path of the offending image
        path: PathBuf,
        /// Number of sample bytes the header announced
        expected_bytes: u64,
        /// Underlying decoder error
        source: image::ImageError,
    },

    /// A per-job allocation could not be satisfied
    OutOfMemory {
        /// Allocation site
        operation: &'static str,
        /// Number of bytes requested
        requested_bytes: usize,
    },

    /// Write into a growable buffer whose storage has already been taken
    BufferInvalidState {
        /// Offset of the rejected write
        offset: usize,
        /// Length of the rejected write
        len: usize,
    },

    /// Artifact could not be created because its directory does not exist
    OutputNotFound {
        /// Path of the artifact
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Job-list file is malformed
    JobList {
        /// Path of the job list
        path: PathBuf,
        /// Description of the problem
        reason: String,
    },

    /// Artifact bytes do not follow the expected layout
    ArtifactFormat {
        /// Description of the problem
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to save a preview image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// At least one job failed and the batch stopped claiming work
    BatchAborted {
        /// Number of failed jobs
        failed: usize,
        /// Number of jobs in the batch
        total: usize,
    },
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputNotFound { path, source } => {
                write!(f, "file not found: input '{}': {source}", path.display())
            }
            Self::MalformedImageHeader { path, reason } => {
                write!(f, "image format error in '{}': {reason}", path.display())
            }
            Self::PixelReadTruncated {
                path,
                expected_bytes,
                source,
            } => {
                write!(
                    f,
                    "pixels reading error in '{}' (expected {expected_bytes} bytes): {source}",
                    path.display()
                )
            }
            Self::OutOfMemory {
                operation,
                requested_bytes,
            } => {
                write!(
                    f,
                    "out of memory during {operation} ({requested_bytes} bytes requested)"
                )
            }
            Self::BufferInvalidState { offset, len } => {
                write!(
                    f,
                    "write error on the dynamic array: {len} bytes at offset {offset} into a taken buffer"
                )
            }
            Self::OutputNotFound { path, source } => {
                write!(f, "file not found: output '{}': {source}", path.display())
            }
            Self::JobList { path, reason } => {
                write!(f, "invalid job list '{}': {reason}", path.display())
            }
            Self::ArtifactFormat { reason } => {
                write!(f, "invalid artifact: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::BatchAborted { failed, total } => {
                write!(f, "{failed} of {total} jobs failed, batch aborted")
            }
        }
    }
}

impl std::error::Error for SynthesisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PixelReadTruncated { source, .. } | Self::ImageExport { source, .. } => {
                Some(source)
            }
            Self::InputNotFound { source, .. }
            | Self::OutputNotFound { source, .. }
            | Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for synthesis results
pub type Result<T> = std::result::Result<T, SynthesisError>;

/// Additional context to enrich error messages
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// File involved in the failing operation
    pub path: Option<PathBuf>,
    /// Operation being performed
    pub operation: Option<&'static str>,
}

/// Enriches file system errors with the path and operation that produced them
pub trait WithContext<T> {
    /// Add error context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;

    /// Add path and operation context
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path and operation applied
    fn with_path(self, path: impl Into<PathBuf>, operation: &'static str) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<SynthesisError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            // Only errors converted without a known location benefit from context
            if let SynthesisError::FileSystem {
                path, operation, ..
            } = &mut error
            {
                if let Some(context_path) = context.path {
                    *path = context_path;
                }
                if let Some(context_operation) = context.operation {
                    *operation = context_operation;
                }
            }
            error
        })
    }

    fn with_path(self, path: impl Into<PathBuf>, operation: &'static str) -> Result<T> {
        self.with_context(ErrorContext {
            path: Some(path.into()),
            operation: Some(operation),
        })
    }
}

impl From<image::ImageError> for SynthesisError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageExport {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for SynthesisError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> SynthesisError {
    SynthesisError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an artifact layout error
pub fn artifact_format(reason: &impl ToString) -> SynthesisError {
    SynthesisError::ArtifactFormat {
        reason: reason.to_string(),
    }
}

/// Create an out-of-memory error
pub const fn out_of_memory(operation: &'static str, requested_bytes: usize) -> SynthesisError {
    SynthesisError::OutOfMemory {
        operation,
        requested_bytes,
    }
}
