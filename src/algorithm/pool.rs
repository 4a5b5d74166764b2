//! Fixed-size worker pool draining a shared job list with fail-fast abort
//!
//! Workers claim jobs from one cursor under a lock, run them outside every
//! lock, and on the first error flip a shared abort flag so that no worker
//! claims further work. Jobs already running are never interrupted.

use crate::io::error::{Result, SynthesisError};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

/// Identity of a pool worker, used to tag diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(pub usize);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}

/// Work performed for every claimed job
pub trait JobExecutor<J>: Send + Sync {
    /// Run one job to completion
    ///
    /// # Errors
    ///
    /// Any error aborts the batch: no worker claims another job afterwards
    fn execute(&self, worker: WorkerId, job: &J) -> Result<()>;

    /// Emit one diagnostic line
    ///
    /// Called with the pool's failure lock held, so lines never interleave.
    // Allow print for diagnostics parsed by the calling process
    #[allow(clippy::print_stderr)]
    fn report(&self, line: &str) {
        eprintln!("{line}");
    }
}

/// A job that returned an error
#[derive(Debug)]
pub struct JobFailure {
    /// Worker that ran the job
    pub worker: WorkerId,
    /// Position of the job in the job list
    pub job_index: usize,
    /// Display name of the job
    pub job: String,
    /// Error returned by the executor
    pub error: SynthesisError,
}

impl fmt::Display for JobFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} not synthesized: {}",
            self.worker, self.job, self.error
        )
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared state of one pool run
///
/// The cursor and the abort flag are the only cross-thread mutable state; the
/// jobs themselves are read-only once the queue is built.
pub struct JobQueue<J> {
    jobs: Arc<[J]>,
    cursor: Mutex<usize>,
    aborted: AtomicBool,
    completed: AtomicUsize,
    failures: Mutex<Vec<JobFailure>>,
}

impl<J> JobQueue<J> {
    /// Create a queue positioned at the first job
    pub const fn new(jobs: Arc<[J]>) -> Self {
        Self {
            jobs,
            cursor: Mutex::new(0),
            aborted: AtomicBool::new(false),
            completed: AtomicUsize::new(0),
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Number of jobs in the queue
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the queue holds no jobs at all
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Claim the next job, or `None` once the cursor has passed the last one
    pub fn claim(&self) -> Option<(usize, &J)> {
        let mut cursor = lock(&self.cursor);
        let index = *cursor;
        let job = self.jobs.get(index)?;
        *cursor += 1;
        Some((index, job))
    }

    /// Number of jobs claimed so far
    pub fn claimed(&self) -> usize {
        *lock(&self.cursor)
    }

    /// Whether a failure has stopped further claims
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    /// Stop further claims without recording a job failure
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
    }

    fn mark_completed(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    /// Abort, record the failure and report it, all under the failure lock
    fn fail(&self, failure: JobFailure, report: impl FnOnce(&JobFailure)) {
        let mut failures = lock(&self.failures);
        self.abort();
        report(&failure);
        failures.push(failure);
    }

    /// Abort and report a worker-level problem under the failure lock
    fn fail_worker(&self, report: impl FnOnce()) {
        let _failures = lock(&self.failures);
        self.abort();
        report();
    }

    fn outcome(&self, lost_workers: usize) -> PoolOutcome {
        PoolOutcome {
            completed: self.completed.load(Ordering::SeqCst),
            failures: std::mem::take(&mut *lock(&self.failures)),
            lost_workers,
            aborted: self.is_aborted(),
        }
    }
}

/// Result of a complete pool run
#[derive(Debug)]
pub struct PoolOutcome {
    /// Jobs that finished without error
    pub completed: usize,
    /// Jobs that returned an error, in the order they were reported
    pub failures: Vec<JobFailure>,
    /// Workers that panicked or could not be started
    pub lost_workers: usize,
    /// Whether the abort flag was set at any point
    pub aborted: bool,
}

impl PoolOutcome {
    /// True iff the abort flag was never set
    pub const fn is_success(&self) -> bool {
        !self.aborted
    }
}

/// Fixed number of OS threads draining a job list
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    worker_count: usize,
}

impl WorkerPool {
    /// Create a pool with `worker_count` workers (at least one is used)
    pub fn new(worker_count: usize) -> Self {
        Self {
            worker_count: worker_count.max(1),
        }
    }

    /// Number of workers started by [`WorkerPool::run`]
    pub const fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Run every job through `executor`, stopping claims on the first failure
    ///
    /// All workers start at once and are joined before returning. A worker
    /// that panics counts as a failure.
    pub fn run<J, E>(&self, jobs: Arc<[J]>, executor: Arc<E>) -> PoolOutcome
    where
        J: fmt::Display + Send + Sync + 'static,
        E: JobExecutor<J> + 'static,
    {
        let queue = Arc::new(JobQueue::new(jobs));
        let mut handles = Vec::with_capacity(self.worker_count);
        let mut lost_workers = 0;

        for index in 0..self.worker_count {
            let worker = WorkerId(index);
            let worker_queue = Arc::clone(&queue);
            let worker_executor = Arc::clone(&executor);
            let spawned = thread::Builder::new()
                .name(worker.to_string())
                .spawn(move || drain(worker, &worker_queue, worker_executor.as_ref()));

            match spawned {
                Ok(handle) => handles.push((worker, handle)),
                Err(error) => {
                    lost_workers += 1;
                    queue.fail_worker(|| {
                        executor.report(&format!("{worker}: could not be started: {error}"));
                    });
                }
            }
        }

        for (worker, handle) in handles {
            if handle.join().is_err() {
                lost_workers += 1;
                queue.fail_worker(|| executor.report(&format!("{worker}: panicked")));
            }
        }

        queue.outcome(lost_workers)
    }
}

/// Worker loop: claim, execute, repeat until the queue is drained or aborted
fn drain<J, E>(worker: WorkerId, queue: &JobQueue<J>, executor: &E)
where
    J: fmt::Display,
    E: JobExecutor<J> + ?Sized,
{
    while !queue.is_aborted() {
        let Some((job_index, job)) = queue.claim() else {
            return;
        };

        match executor.execute(worker, job) {
            Ok(()) => queue.mark_completed(),
            Err(error) => {
                let failure = JobFailure {
                    worker,
                    job_index,
                    job: job.to_string(),
                    error,
                };
                queue.fail(failure, |failure| executor.report(&failure.to_string()));
                return;
            }
        }
    }
}
