//! Batch orchestration over the worker pool.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::converter::{BatchRequest, ConverterError, FileOutcome};
use crate::pool::{Job, JobResult, WorkerPool};

use super::paths::output_path;

/// Job option key carrying the target format.
pub const OPT_FORMAT: &str = "format";

/// Drives one batch conversion end to end: builds the result slots, fans
/// jobs out across a worker pool, matches outcomes back to slots, and
/// guarantees every slot reaches a terminal state.
pub struct BatchOrchestrator {
    worker_count: usize,
}

impl BatchOrchestrator {
    /// Creates an orchestrator with the given default worker count. A
    /// count of zero defers to the pool default.
    pub fn new(worker_count: usize) -> Self {
        Self { worker_count }
    }

    /// Runs the batch, returning one terminal [`FileOutcome`] per input in
    /// input order.
    ///
    /// Fails as a whole only before any dispatch: empty input list, empty
    /// or uncreatable output directory, or a cancellation already in
    /// effect. Per-file failures are captured in their slots.
    ///
    /// Inputs with the same file stem map to the same output path and
    /// collide in the result index, so only one of their slots receives
    /// the job outcome. TODO: disambiguate duplicate stems once
    /// [`output_path`] mirrors input directories under `keep_structure`.
    pub async fn run<F, Fut>(
        &self,
        cancel: &CancellationToken,
        request: &BatchRequest,
        process: F,
    ) -> Result<Vec<FileOutcome>, ConverterError>
    where
        F: Fn(Job) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ConverterError>> + Send + 'static,
    {
        if request.input_paths.is_empty() {
            return Err(ConverterError::NoInputs);
        }
        if request.output_dir.as_os_str().is_empty() {
            return Err(ConverterError::EmptyOutputDir);
        }
        if cancel.is_cancelled() {
            return Err(ConverterError::Cancelled);
        }

        if let Err(e) = tokio::fs::create_dir_all(&request.output_dir).await {
            warn!(
                dir = %request.output_dir.display(),
                error = %e,
                "failed to create output directory"
            );
            return Err(ConverterError::OutputDirectoryFailed {
                path: request.output_dir.clone(),
            });
        }

        // Slots, jobs, and the output-path index are all built before any
        // concurrency starts; the index is read-only from here on.
        let total = request.input_paths.len();
        let mut slots = Vec::with_capacity(total);
        let mut jobs = Vec::with_capacity(total);
        let mut index = HashMap::with_capacity(total);
        for (i, input) in request.input_paths.iter().enumerate() {
            let out = output_path(
                input,
                &request.output_dir,
                request.format,
                request.keep_structure,
            );
            index.insert(out.clone(), i);
            jobs.push(
                Job::new(input, &out).with_option(OPT_FORMAT, request.format.extension()),
            );
            slots.push(FileOutcome::pending(input.clone(), out));
        }

        let slots = Arc::new(Mutex::new(slots));
        let index: Arc<HashMap<PathBuf, usize>> = Arc::new(index);

        let workers = if request.workers > 0 {
            request.workers
        } else {
            self.worker_count
        };
        let pool = Arc::new(WorkerPool::<ConverterError>::new(cancel, workers));
        debug!(
            files = total,
            workers = pool.worker_count(),
            "starting batch conversion"
        );
        pool.start(process).await;

        let mut results_rx = match pool.take_results().await {
            Some(rx) => rx,
            None => {
                pool.close().await;
                return Err(ConverterError::conversion_failed(
                    "result stream already consumed",
                    None,
                ));
            }
        };

        let submitter = {
            let pool = Arc::clone(&pool);
            let slots = Arc::clone(&slots);
            let index = Arc::clone(&index);
            tokio::spawn(async move {
                for job in jobs {
                    let output = job.output_path.clone();
                    if !pool.submit(job).await {
                        mark_slot(&slots, &index, &output, FileOutcome::mark_not_submitted);
                    }
                }
                pool.close_jobs().await;
            })
        };

        let collector = {
            let slots = Arc::clone(&slots);
            let index = Arc::clone(&index);
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let mut matched = 0usize;
                while matched < total {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            debug!(matched, total, "collector stopped by cancellation");
                            break;
                        }
                        received = results_rx.recv() => match received {
                            Some(result) => {
                                // Only results that resolve to a slot count
                                // toward completion.
                                if apply_result(&slots, &index, result) {
                                    matched += 1;
                                }
                            }
                            None => break,
                        },
                    }
                }
            })
        };

        let (submitted, collected) = tokio::join!(submitter, collector);
        if let Err(e) = submitted {
            warn!("submitter task panicked: {}", e);
        }
        if let Err(e) = collected {
            warn!("collector task panicked: {}", e);
        }
        pool.close().await;

        let mut slots = match Arc::try_unwrap(slots) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(arc) => arc.lock().unwrap_or_else(PoisonError::into_inner).clone(),
        };

        // Final sweep: anything still pending was dispatched but its
        // result never came back.
        for slot in slots.iter_mut() {
            if !slot.is_terminal() {
                slot.mark_not_processed();
            }
        }

        debug!(
            succeeded = slots.iter().filter(|s| s.success).count(),
            total,
            "batch conversion finished"
        );
        Ok(slots)
    }
}

fn mark_slot(
    slots: &Mutex<Vec<FileOutcome>>,
    index: &HashMap<PathBuf, usize>,
    output: &PathBuf,
    apply: impl FnOnce(&mut FileOutcome),
) -> bool {
    let Some(&i) = index.get(output) else {
        warn!(output = %output.display(), "no slot for output path");
        return false;
    };
    let mut guard = slots.lock().unwrap_or_else(PoisonError::into_inner);
    match guard.get_mut(i) {
        Some(slot) => {
            apply(slot);
            true
        }
        None => false,
    }
}

fn apply_result(
    slots: &Mutex<Vec<FileOutcome>>,
    index: &HashMap<PathBuf, usize>,
    result: JobResult<ConverterError>,
) -> bool {
    match result.outcome {
        Ok(()) => mark_slot(slots, index, &result.job.output_path, FileOutcome::mark_success),
        Err(e) => {
            warn!(
                input = %result.job.input_path.display(),
                error = %e,
                "conversion failed"
            );
            mark_slot(slots, index, &result.job.output_path, |slot| {
                slot.mark_failed(&e)
            })
        }
    }
}
