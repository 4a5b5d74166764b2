//! Plain-text job list: source directory, destination directory, job names
//!
//! The file is a stream of whitespace-separated tokens:
//!
//! ```text
//! <source_directory> <destination_directory> <count>
//! <name>.<ext> ... (count entries)
//! ```
//!
//! Only the part of each entry before its first `.` is kept; extensions are
//! discarded because the pipeline appends its own.

use crate::io::error::{Result, SynthesisError, WithContext};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Parsed job list shared read-only with every worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobList {
    /// Directory holding the source images
    pub source_directory: PathBuf,
    /// Directory receiving the artifacts
    pub destination_directory: PathBuf,
    /// Job identifiers in claim order
    pub jobs: Arc<[String]>,
}

impl JobList {
    /// Read and parse the job list at `path`
    ///
    /// # Errors
    ///
    /// Returns `FileSystem` if the file cannot be read and `JobList` if its
    /// contents are malformed
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).with_path(path, "read job list")?;
        Self::parse(&contents).map_err(|reason| SynthesisError::JobList {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse job-list text, returning a description of the first problem
    ///
    /// # Errors
    ///
    /// Returns the reason if a header token is missing, the count is not a
    /// non-negative integer, fewer entries than announced are present, or an
    /// entry has an empty name
    pub fn parse(contents: &str) -> std::result::Result<Self, String> {
        let mut tokens = contents.split_whitespace();

        let source_directory = tokens
            .next()
            .ok_or_else(|| "missing source directory".to_string())?;
        let destination_directory = tokens
            .next()
            .ok_or_else(|| "missing destination directory".to_string())?;
        let count_token = tokens
            .next()
            .ok_or_else(|| "missing job count".to_string())?;
        let count: usize = count_token
            .parse()
            .map_err(|error| format!("invalid job count '{count_token}': {error}"))?;

        let mut jobs = Vec::with_capacity(count.min(contents.len()));
        for position in 0..count {
            let entry = tokens
                .next()
                .ok_or_else(|| format!("expected {count} jobs, found {position}"))?;
            let name = job_name(entry);
            if name.is_empty() {
                return Err(format!("job {position} ('{entry}') has an empty name"));
            }
            jobs.push(name.to_string());
        }

        Ok(Self {
            source_directory: PathBuf::from(source_directory),
            destination_directory: PathBuf::from(destination_directory),
            jobs: jobs.into(),
        })
    }

    /// Number of jobs
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the list holds no jobs
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Portion of a job entry before its first `.`
pub fn job_name(entry: &str) -> &str {
    entry.split_once('.').map_or(entry, |(name, _extension)| name)
}
