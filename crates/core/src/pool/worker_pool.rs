//! Worker pool implementation.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::types::{Job, JobResult};

/// Worker count used when the caller passes zero.
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Lower bound on queue capacity so tiny pools still get some slack
/// between the submitter and the collector.
const MIN_QUEUE_CAPACITY: usize = 8;

/// A fixed-size pool of worker tasks over bounded job and result queues.
///
/// The pool is bound to a cancellation token derived from the caller's, so
/// it can be cancelled independently of its parent scope. All operations
/// are safe to call concurrently; `close` and `cancel` are idempotent.
pub struct WorkerPool<E> {
    worker_count: usize,
    cancel: CancellationToken,
    jobs_tx: Mutex<Option<mpsc::Sender<Job>>>,
    jobs_rx: Arc<Mutex<mpsc::Receiver<Job>>>,
    results_tx: Mutex<Option<mpsc::Sender<JobResult<E>>>>,
    results_rx: Mutex<Option<mpsc::Receiver<JobResult<E>>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl<E: Send + 'static> WorkerPool<E> {
    /// Creates a new pool with the given worker count.
    ///
    /// A count of zero falls back to [`DEFAULT_WORKER_COUNT`]. Queue
    /// capacity is `max(8, 2 * worker_count)` for both queues.
    pub fn new(parent: &CancellationToken, worker_count: usize) -> Self {
        let worker_count = if worker_count == 0 {
            DEFAULT_WORKER_COUNT
        } else {
            worker_count
        };

        let capacity = MIN_QUEUE_CAPACITY.max(2 * worker_count);
        let (jobs_tx, jobs_rx) = mpsc::channel(capacity);
        let (results_tx, results_rx) = mpsc::channel(capacity);

        Self {
            worker_count,
            cancel: parent.child_token(),
            jobs_tx: Mutex::new(Some(jobs_tx)),
            jobs_rx: Arc::new(Mutex::new(jobs_rx)),
            results_tx: Mutex::new(Some(results_tx)),
            results_rx: Mutex::new(Some(results_rx)),
            workers: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Returns the number of workers in this pool.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Spawns the worker tasks.
    ///
    /// Each worker pulls jobs from the shared queue and runs `process` on
    /// them to completion, then attempts to enqueue the outcome. The pool
    /// keeps no result sender of its own after this call, so the results
    /// channel closes exactly when the last worker exits.
    pub async fn start<F, Fut>(&self, process: F)
    where
        F: Fn(Job) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
    {
        let Some(results_tx) = self.results_tx.lock().await.take() else {
            warn!("worker pool already started");
            return;
        };

        let mut workers = self.workers.lock().await;
        for id in 0..self.worker_count {
            let jobs_rx = Arc::clone(&self.jobs_rx);
            let results_tx = results_tx.clone();
            let cancel = self.cancel.clone();
            let process = process.clone();
            workers.push(tokio::spawn(async move {
                worker_loop(id, jobs_rx, results_tx, cancel, process).await;
            }));
        }
        debug!("started {} workers", self.worker_count);
    }

    /// Enqueues a job, suspending while the queue is full.
    ///
    /// Returns `false` instead of blocking forever when the cancellation
    /// signal fires first, or when the pool has been closed.
    pub async fn submit(&self, job: Job) -> bool {
        if self.closed.load(Ordering::SeqCst) || self.cancel.is_cancelled() {
            return false;
        }

        // Clone the sender out so close_jobs is never blocked behind a
        // submit that is suspended on a full queue.
        let jobs_tx = {
            let guard = self.jobs_tx.lock().await;
            match guard.as_ref() {
                Some(tx) => tx.clone(),
                None => return false,
            }
        };

        tokio::select! {
            _ = self.cancel.cancelled() => false,
            sent = jobs_tx.send(job) => sent.is_ok(),
        }
    }

    /// Closes the job queue so workers observe end-of-input after draining
    /// the remaining buffered jobs. Idempotent, safe under cancellation.
    pub async fn close_jobs(&self) {
        self.jobs_tx.lock().await.take();
    }

    /// Fires the shared cancellation signal. Never blocks; may be called
    /// any number of times.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the pool has been fully shut down via [`close`](Self::close).
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Full shutdown: cancels, waits for every worker to finish its
    /// current unit of work, and closes both queues. Idempotent.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        self.cancel.cancel();
        self.close_jobs().await;

        let handles = {
            let mut workers = self.workers.lock().await;
            std::mem::take(&mut *workers)
        };
        for handle in handles {
            if let Err(e) = handle.await {
                warn!("worker task panicked: {}", e);
            }
        }

        // If start was never called, this drops the last result sender.
        self.results_tx.lock().await.take();
        debug!("worker pool closed");
    }

    /// Hands the result receiver to the single collector.
    ///
    /// Returns `None` on the second and subsequent calls.
    pub async fn take_results(&self) -> Option<mpsc::Receiver<JobResult<E>>> {
        self.results_rx.lock().await.take()
    }
}

/// One worker: wait for a job or cancellation, run the job to completion,
/// then try to transmit the outcome.
async fn worker_loop<E, F, Fut>(
    id: usize,
    jobs_rx: Arc<Mutex<mpsc::Receiver<Job>>>,
    results_tx: mpsc::Sender<JobResult<E>>,
    cancel: CancellationToken,
    process: F,
) where
    E: Send + 'static,
    F: Fn(Job) -> Fut,
    Fut: Future<Output = Result<(), E>> + Send,
{
    loop {
        let job = {
            let mut rx = jobs_rx.lock().await;
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("worker {} observed cancellation while idle", id);
                    return;
                }
                received = rx.recv() => match received {
                    Some(job) => job,
                    None => {
                        debug!("worker {} observed job queue closure", id);
                        return;
                    }
                },
            }
        };

        // A job that raced the cancellation signal is dropped silently,
        // without producing a result.
        if cancel.is_cancelled() {
            debug!("worker {} dropping job after cancellation", id);
            return;
        }

        // The unit of work runs to completion either way; only the result
        // transport races the cancellation signal.
        let outcome = process(job.clone()).await;

        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("worker {} abandoned result under cancellation", id);
                return;
            }
            sent = results_tx.send(JobResult { job, outcome }) => {
                if sent.is_err() {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_zero_worker_count_uses_default() {
        let cancel = CancellationToken::new();
        let pool: WorkerPool<String> = WorkerPool::new(&cancel, 0);
        assert_eq!(pool.worker_count(), DEFAULT_WORKER_COUNT);
    }

    #[tokio::test]
    async fn test_submit_after_close_jobs_fails() {
        let cancel = CancellationToken::new();
        let pool: WorkerPool<String> = WorkerPool::new(&cancel, 2);
        pool.close_jobs().await;
        assert!(!pool.submit(Job::new("/a", "/b")).await);
    }

    #[tokio::test]
    async fn test_submit_after_cancel_fails() {
        let cancel = CancellationToken::new();
        let pool: WorkerPool<String> = WorkerPool::new(&cancel, 1);
        pool.start(|_job| async { Ok(()) }).await;
        pool.cancel();
        // Fill beyond capacity; submit must return false, never deadlock.
        for _ in 0..32 {
            assert!(!pool.submit(Job::new("/a", "/b")).await);
        }
        pool.close().await;
    }

    #[tokio::test]
    async fn test_parent_cancellation_propagates() {
        let cancel = CancellationToken::new();
        let pool: WorkerPool<String> = WorkerPool::new(&cancel, 1);
        cancel.cancel();
        assert!(!pool.submit(Job::new("/a", "/b")).await);
    }

    #[tokio::test]
    async fn test_take_results_is_single_consumer() {
        let cancel = CancellationToken::new();
        let pool: WorkerPool<String> = WorkerPool::new(&cancel, 1);
        assert!(pool.take_results().await.is_some());
        assert!(pool.take_results().await.is_none());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let cancel = CancellationToken::new();
        let pool: WorkerPool<String> = WorkerPool::new(&cancel, 2);
        pool.start(|_job| async { Ok(()) }).await;
        pool.close().await;
        pool.close().await;
        assert!(pool.is_closed());
    }
}
