//! Tests for the worker pool: claiming, fail-fast abort and diagnostics

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use texgram::Result;
    use texgram::algorithm::pool::{JobExecutor, JobQueue, WorkerId, WorkerPool};
    use texgram::io::error::invalid_parameter;

    /// Records executed jobs and fails on the configured ones
    #[derive(Default)]
    struct RecordingExecutor {
        failing: HashSet<usize>,
        executed: Mutex<Vec<usize>>,
        workers: Mutex<HashSet<WorkerId>>,
        reports: Mutex<Vec<String>>,
    }

    impl RecordingExecutor {
        fn failing_on(jobs: &[usize]) -> Self {
            Self {
                failing: jobs.iter().copied().collect(),
                ..Self::default()
            }
        }

        fn executed(&self) -> Vec<usize> {
            self.executed.lock().map(|jobs| jobs.clone()).unwrap_or_default()
        }

        fn worker_count(&self) -> usize {
            self.workers.lock().map(|workers| workers.len()).unwrap_or_default()
        }

        fn reports(&self) -> Vec<String> {
            self.reports.lock().map(|lines| lines.clone()).unwrap_or_default()
        }
    }

    impl JobExecutor<usize> for RecordingExecutor {
        fn execute(&self, worker: WorkerId, job: &usize) -> Result<()> {
            if let Ok(mut executed) = self.executed.lock() {
                executed.push(*job);
            }
            if let Ok(mut workers) = self.workers.lock() {
                workers.insert(worker);
            }
            if self.failing.contains(job) {
                return Err(invalid_parameter("job", job, &"rejected by test"));
            }
            Ok(())
        }

        fn report(&self, line: &str) {
            if let Ok(mut reports) = self.reports.lock() {
                reports.push(line.to_string());
            }
        }
    }

    struct PanickingExecutor;

    impl JobExecutor<usize> for PanickingExecutor {
        // Allow panic to simulate a crashing worker
        #[allow(clippy::panic)]
        fn execute(&self, _worker: WorkerId, job: &usize) -> Result<()> {
            panic!("job {job} crashed");
        }

        fn report(&self, _line: &str) {}
    }

    fn jobs(count: usize) -> Arc<[usize]> {
        (0..count).collect::<Vec<_>>().into()
    }

    // Tests every job runs exactly once across several workers
    // Verified by letting two workers read the cursor before incrementing
    #[test]
    fn test_all_jobs_run_once() {
        let executor = Arc::new(RecordingExecutor::default());
        let outcome = WorkerPool::new(4).run(jobs(100), Arc::clone(&executor));

        assert!(outcome.is_success());
        assert_eq!(outcome.completed, 100);
        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.lost_workers, 0);

        let mut executed = executor.executed();
        executed.sort_unstable();
        assert_eq!(executed, (0..100).collect::<Vec<_>>());
        assert!((1..=4).contains(&executor.worker_count()));
    }

    // Tests a single worker stops claiming right after the first failure
    // Verified by checking the abort flag only after claiming
    #[test]
    fn test_fail_fast_single_worker() {
        let executor = Arc::new(RecordingExecutor::failing_on(&[3]));
        let outcome = WorkerPool::new(1).run(jobs(10), Arc::clone(&executor));

        assert!(!outcome.is_success());
        assert!(outcome.aborted);
        assert_eq!(outcome.completed, 3);
        assert_eq!(executor.executed(), vec![0, 1, 2, 3]);

        let failure = outcome.failures.first().expect("one failure recorded");
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(failure.job_index, 3);
        assert_eq!(failure.job, "3");
        assert_eq!(failure.worker, WorkerId(0));
    }

    // Tests the failure report is a single line tagged with the worker and job
    // Verified by reporting before the failure is recorded
    #[test]
    fn test_failure_report_line() {
        let executor = Arc::new(RecordingExecutor::failing_on(&[0]));
        let outcome = WorkerPool::new(1).run(jobs(5), Arc::clone(&executor));

        let reports = executor.reports();
        assert_eq!(reports.len(), 1);
        let line = reports.first().expect("one report");
        assert!(line.starts_with("worker-0: 0 not synthesized"));
        assert!(line.contains("rejected by test"));
        assert!(!line.contains('\n'));
        assert_eq!(outcome.completed, 0);
    }

    // Tests concurrent failures are all recorded and the batch is aborted
    // Verified by overwriting earlier failures
    #[test]
    fn test_every_job_failing() {
        let failing: Vec<usize> = (0..8).collect();
        let executor = Arc::new(RecordingExecutor::failing_on(&failing));
        let outcome = WorkerPool::new(4).run(jobs(8), Arc::clone(&executor));

        assert!(outcome.aborted);
        assert_eq!(outcome.completed, 0);
        assert!(!outcome.failures.is_empty());
        assert!(outcome.failures.len() <= 4);
        assert_eq!(executor.reports().len(), outcome.failures.len());
    }

    // Tests a panicking worker counts as lost and aborts the batch
    // Verified by ignoring join errors
    #[test]
    fn test_panicking_worker_is_lost() {
        let outcome = WorkerPool::new(2).run(jobs(4), Arc::new(PanickingExecutor));

        assert!(outcome.aborted);
        assert!(!outcome.is_success());
        assert!(outcome.lost_workers >= 1);
        assert_eq!(outcome.completed, 0);
    }

    // Tests an empty job list finishes successfully
    // Verified by treating an empty queue as aborted
    #[test]
    fn test_empty_job_list() {
        let executor = Arc::new(RecordingExecutor::default());
        let outcome = WorkerPool::new(3).run(jobs(0), Arc::clone(&executor));

        assert!(outcome.is_success());
        assert_eq!(outcome.completed, 0);
        assert!(executor.executed().is_empty());
    }

    // Tests a zero worker count is raised to one
    // Verified by accepting zero workers
    #[test]
    fn test_worker_count_minimum() {
        assert_eq!(WorkerPool::new(0).worker_count(), 1);
        assert_eq!(WorkerPool::new(6).worker_count(), 6);
    }

    // Tests the queue hands out jobs in order and stops at the end
    // Verified by incrementing the cursor past the last job
    #[test]
    fn test_queue_claims_in_order() {
        let queue = JobQueue::new(jobs(2));
        assert_eq!(queue.len(), 2);
        assert!(!queue.is_empty());

        assert_eq!(queue.claim(), Some((0, &0)));
        assert_eq!(queue.claim(), Some((1, &1)));
        assert_eq!(queue.claim(), None);
        assert_eq!(queue.claimed(), 2);
    }

    // Tests aborting is visible and sticky
    // Verified by clearing the flag on the next claim
    #[test]
    fn test_queue_abort() {
        let queue = JobQueue::new(jobs(3));
        assert!(!queue.is_aborted());
        queue.abort();
        assert!(queue.is_aborted());
        assert!(queue.claim().is_some());
        assert!(queue.is_aborted());
    }

    // Tests worker identifiers render as thread names
    // Verified by printing the bare index
    #[test]
    fn test_worker_id_display() {
        assert_eq!(WorkerId(3).to_string(), "worker-3");
    }
}
