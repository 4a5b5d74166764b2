//! Command-line interface for batch gram synthesis over a job list

use crate::algorithm::pool::{PoolOutcome, WorkerPool};
use crate::analysis::synthesis::{BatchSynthesizer, SynthesisConfig};
use crate::io::configuration::{DEFAULT_GRAM_SIZE, DEFAULT_THREAD_COUNT, MAX_GRAM_SIZE};
use crate::io::error::{Result, SynthesisError, invalid_parameter};
use crate::io::joblist::JobList;
use crate::io::progress::ProgressManager;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "texgram")]
#[command(
    author,
    version,
    about = "Extract binary texture gram statistics from a batch of RGB images"
)]
/// Command-line arguments for the synthesis tool
pub struct Cli {
    /// Job list naming the source directory, destination directory and jobs
    #[arg(value_name = "JOB_LIST")]
    pub job_list: PathBuf,

    /// Number of worker threads
    #[arg(short, long, default_value_t = DEFAULT_THREAD_COUNT)]
    pub threads: usize,

    /// Edge length of the gram windows
    #[arg(short, long, default_value_t = DEFAULT_GRAM_SIZE)]
    pub gram_size: usize,

    /// Also write recurrence map and bitboard previews as PNG
    #[arg(short, long)]
    pub render: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Reject parameter values the pipeline cannot honour
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the gram size is outside
    /// `1..=MAX_GRAM_SIZE` or the thread count is zero
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_GRAM_SIZE).contains(&self.gram_size) {
            return Err(invalid_parameter(
                "gram_size",
                &self.gram_size,
                &format!("must be between 1 and {MAX_GRAM_SIZE}"),
            ));
        }
        if self.threads == 0 {
            return Err(invalid_parameter(
                "threads",
                &self.threads,
                &"must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Orchestrates one batch: job list, worker pool and progress display
pub struct BatchProcessor {
    cli: Cli,
}

impl BatchProcessor {
    /// Create a processor for the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run every job of the job list
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A parameter is out of range (`InvalidParameter`)
    /// - The job list cannot be read or parsed
    /// - Any job failed or a worker was lost (`BatchAborted`)
    pub fn process(&self) -> Result<()> {
        self.cli.validate()?;
        let job_list = JobList::load(&self.cli.job_list)?;
        let total = job_list.len();

        let outcome = self.run(&job_list);

        if outcome.is_success() {
            Ok(())
        } else {
            Err(SynthesisError::BatchAborted {
                failed: outcome.failures.len() + outcome.lost_workers,
                total,
            })
        }
    }

    /// Drain `job_list` through a fresh pool and return the raw outcome
    pub fn run(&self, job_list: &JobList) -> PoolOutcome {
        let pool = WorkerPool::new(self.cli.threads);
        let progress = self
            .cli
            .should_show_progress()
            .then(|| Arc::new(ProgressManager::new(job_list.len(), pool.worker_count())));

        let config = SynthesisConfig::from_job_list(job_list, self.cli.gram_size, self.cli.render);
        let executor = Arc::new(BatchSynthesizer::new(config, progress.clone()));
        let outcome = pool.run(Arc::clone(&job_list.jobs), executor);

        if let Some(progress) = progress {
            progress.finish();
        }
        outcome
    }
}
