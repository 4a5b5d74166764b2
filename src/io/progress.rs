//! Batch progress display with one status line per worker for small pools

use crate::algorithm::pool::WorkerId;
use crate::io::configuration::{MAX_INDIVIDUAL_PROGRESS_BARS, PROGRESS_BAR_WIDTH};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Jobs: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} ({{percent}}%)"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static WORKER_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("  {prefix:>10} {spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

/// Coordinates progress display for a pool run
///
/// Shows a batch bar over all jobs. Pools of up to
/// [`MAX_INDIVIDUAL_PROGRESS_BARS`] workers also get one line per worker
/// naming the job it is synthesizing. Every method takes `&self`, so one
/// manager can be shared by all workers.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: ProgressBar,
    worker_bars: Vec<ProgressBar>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl ProgressManager {
    /// Create bars for `job_count` jobs spread over `worker_count` workers
    pub fn new(job_count: usize, worker_count: usize) -> Self {
        let multi_progress = MultiProgress::new();
        let batch_bar = multi_progress.add(ProgressBar::new(job_count as u64));
        batch_bar.set_style(BATCH_STYLE.clone());

        // Switch to batch-only mode for large pools to avoid terminal spam
        let worker_bars = if worker_count <= MAX_INDIVIDUAL_PROGRESS_BARS {
            (0..worker_count)
                .map(|index| {
                    let bar = multi_progress.add(ProgressBar::new_spinner());
                    bar.set_style(WORKER_STYLE.clone());
                    bar.set_prefix(WorkerId(index).to_string());
                    bar.set_message("idle");
                    bar
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            multi_progress,
            batch_bar,
            worker_bars,
        }
    }

    /// Show that `worker` claimed `job`
    pub fn start_job(&self, worker: WorkerId, job: &str) {
        if let Some(bar) = self.worker_bars.get(worker.0) {
            bar.set_message(job.to_string());
            bar.tick();
        }
    }

    /// Count one finished job and mark `worker` idle
    pub fn complete_job(&self, worker: WorkerId) {
        self.batch_bar.inc(1);
        if let Some(bar) = self.worker_bars.get(worker.0) {
            bar.set_message("idle");
        }
    }

    /// Mark `worker` as stopped on `job` without counting it as finished
    pub fn fail_job(&self, worker: WorkerId, job: &str) {
        if let Some(bar) = self.worker_bars.get(worker.0) {
            bar.set_message(format!("failed: {job}"));
        }
    }

    /// Current status line of `worker`, if it has one
    pub fn worker_status(&self, worker: WorkerId) -> Option<String> {
        self.worker_bars.get(worker.0).map(ProgressBar::message)
    }

    /// Jobs counted as finished so far
    pub fn completed(&self) -> u64 {
        self.batch_bar.position()
    }

    /// Print a diagnostic line without tearing the bars
    // Allow print for diagnostics parsed by the calling process
    #[allow(clippy::print_stderr)]
    pub fn report(&self, line: &str) {
        self.multi_progress.suspend(|| eprintln!("{line}"));
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        for bar in &self.worker_bars {
            bar.finish_and_clear();
        }
        self.batch_bar.finish_with_message("All jobs processed");
        let _ = self.multi_progress.clear();
    }
}
