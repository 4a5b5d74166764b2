//! Per-job gram synthesis: read, binarize, extract, serialize
//!
//! Every buffer a job allocates is owned by the call that runs it and is
//! dropped when that call returns, whether it succeeds or not.

use crate::algorithm::pool::{JobExecutor, WorkerId};
use crate::analysis::brightness::binarize;
use crate::analysis::grams::GramStatistics;
use crate::io::artifact::save_artifact;
use crate::io::configuration::{
    ARTIFACT_EXTENSION, BITBOARD_PREVIEW_SUFFIX, IMAGE_EXTENSION, MAP_PREVIEW_SUFFIX,
    PREVIEW_EXTENSION,
};
use crate::io::error::Result;
use crate::io::image::{bitboard_to_image, export_preview, read_rgb_image, recurrence_map_to_image};
use crate::io::joblist::JobList;
use crate::io::progress::ProgressManager;
use ndarray::Array3;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Settings shared by every job of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisConfig {
    /// Directory holding the source images
    pub source_directory: PathBuf,
    /// Directory receiving the artifacts
    pub destination_directory: PathBuf,
    /// Edge length of the gram windows
    pub gram_size: usize,
    /// Whether to render preview images next to each artifact
    pub render_previews: bool,
}

impl SynthesisConfig {
    /// Settings for the directories of `job_list`
    pub fn from_job_list(job_list: &JobList, gram_size: usize, render_previews: bool) -> Self {
        Self {
            source_directory: job_list.source_directory.clone(),
            destination_directory: job_list.destination_directory.clone(),
            gram_size,
            render_previews,
        }
    }

    /// File locations used by `job`
    pub fn paths(&self, job: &str) -> JobPaths {
        JobPaths::new(&self.source_directory, &self.destination_directory, job)
    }
}

/// File locations used by one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPaths {
    /// Source image, `{source}/{job}.ppm`
    pub image: PathBuf,
    /// Artifact, `{destination}/{job}.bin`
    pub artifact: PathBuf,
    /// Recurrence map preview, `{destination}/{job}_map.png`
    pub map_preview: PathBuf,
    /// Bitboard preview, `{destination}/{job}_bw.png`
    pub bitboard_preview: PathBuf,
}

impl JobPaths {
    /// Locations for `job` under the given directories
    ///
    /// Job names may contain `/` to address subdirectories.
    pub fn new(source_directory: &Path, destination_directory: &Path, job: &str) -> Self {
        let with_suffix = |directory: &Path, suffix: &str, extension: &str| {
            directory.join(format!("{job}{suffix}.{extension}"))
        };

        Self {
            image: with_suffix(source_directory, "", IMAGE_EXTENSION),
            artifact: with_suffix(destination_directory, "", ARTIFACT_EXTENSION),
            map_preview: with_suffix(destination_directory, MAP_PREVIEW_SUFFIX, PREVIEW_EXTENSION),
            bitboard_preview: with_suffix(
                destination_directory,
                BITBOARD_PREVIEW_SUFFIX,
                PREVIEW_EXTENSION,
            ),
        }
    }
}

/// Compute gram statistics for an RGB image indexed `(row, col, channel)`
///
/// The image is binarized around its median brightness, then every
/// `gram_size` window is grouped and counted.
///
/// # Errors
///
/// Returns an error if:
/// - The image has no pixels
/// - `gram_size` is zero
/// - The pattern buffer cannot grow
pub fn synthesize(image: &Array3<u8>, gram_size: usize) -> Result<GramStatistics> {
    let bitboard = binarize(image)?;
    GramStatistics::extract(bitboard, gram_size)
}

/// Run one job end to end and return its statistics
///
/// # Errors
///
/// Returns an error if:
/// - The source image is missing, malformed or truncated
/// - Synthesis fails
/// - The artifact or a preview cannot be written
pub fn synthesize_job(config: &SynthesisConfig, job: &str) -> Result<GramStatistics> {
    let paths = config.paths(job);

    let statistics = {
        let image = read_rgb_image(&paths.image)?;
        synthesize(&image, config.gram_size)?
    };

    save_artifact(&statistics, &paths.artifact)?;

    if config.render_previews {
        export_preview(
            &recurrence_map_to_image(statistics.recurrence_map()),
            &paths.map_preview,
        )?;
        export_preview(
            &bitboard_to_image(statistics.bitboard()),
            &paths.bitboard_preview,
        )?;
    }

    Ok(statistics)
}

/// Pool executor synthesizing one image per job
pub struct BatchSynthesizer {
    config: SynthesisConfig,
    progress: Option<Arc<ProgressManager>>,
}

impl BatchSynthesizer {
    /// Create an executor, optionally driving a progress display
    pub const fn new(config: SynthesisConfig, progress: Option<Arc<ProgressManager>>) -> Self {
        Self { config, progress }
    }

    /// Settings used for every job
    pub const fn config(&self) -> &SynthesisConfig {
        &self.config
    }
}

impl JobExecutor<String> for BatchSynthesizer {
    fn execute(&self, worker: WorkerId, job: &String) -> Result<()> {
        if let Some(progress) = &self.progress {
            progress.start_job(worker, job);
        }

        let outcome = synthesize_job(&self.config, job);

        if let Some(progress) = &self.progress {
            match &outcome {
                Ok(_) => progress.complete_job(worker),
                Err(_) => progress.fail_job(worker, job),
            }
        }
        outcome.map(|_statistics| ())
    }

    // Allow print for diagnostics parsed by the calling process
    #[allow(clippy::print_stderr)]
    fn report(&self, line: &str) {
        match &self.progress {
            Some(progress) => progress.report(line),
            None => eprintln!("{line}"),
        }
    }
}
