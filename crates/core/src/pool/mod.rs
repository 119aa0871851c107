//! Bounded worker pool for concurrent job processing.
//!
//! The pool fans jobs out to a fixed number of worker tasks over a bounded
//! job queue and fans outcomes back in over a bounded result queue. A single
//! cancellation token, derived from the caller's token, controls the whole
//! pipeline: submission stops, idle workers exit, and in-flight results are
//! abandoned once it fires. A unit of work that has already started is never
//! preempted.
//!
//! # Example
//!
//! ```ignore
//! use fileforge_core::pool::{Job, WorkerPool};
//! use tokio_util::sync::CancellationToken;
//!
//! let cancel = CancellationToken::new();
//! let pool: WorkerPool<MyError> = WorkerPool::new(&cancel, 4);
//! pool.start(|job| async move { process(job).await }).await;
//!
//! let mut results = pool.take_results().await.unwrap();
//! pool.submit(job).await;
//! pool.close_jobs().await;
//! while let Some(result) = results.recv().await {
//!     // one result per dispatched job, arbitrary order
//! }
//! pool.close().await;
//! ```

mod types;
mod worker_pool;

pub use types::{Job, JobResult};
pub use worker_pool::{WorkerPool, DEFAULT_WORKER_COUNT};
