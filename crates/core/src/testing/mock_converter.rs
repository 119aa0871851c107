//! Mock converter for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::batch::BatchOrchestrator;
use crate::converter::{BatchRequest, Converter, ConverterError, FileOutcome, ImageFormat};

/// A recorded conversion for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedConversion {
    /// Input path that was converted.
    pub input_path: PathBuf,
    /// Output path that was written.
    pub output_path: PathBuf,
    /// Whether the conversion succeeded.
    pub success: bool,
}

/// Mock implementation of the Converter trait.
///
/// Provides controllable behavior for testing:
/// - Track conversions for assertions
/// - Fail specific input paths with a configured reason
/// - Delay specific input paths, or all of them, to exercise
///   cancellation and scheduling
///
/// Batch conversion runs through the real orchestrator and worker pool,
/// so batch-level invariants hold in tests exactly as in production.
#[derive(Debug, Clone)]
pub struct MockConverter {
    conversions: Arc<RwLock<Vec<RecordedConversion>>>,
    failures: Arc<RwLock<HashMap<PathBuf, String>>>,
    delays: Arc<RwLock<HashMap<PathBuf, Duration>>>,
    default_delay: Arc<RwLock<Duration>>,
    fail_missing: Arc<RwLock<bool>>,
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConverter {
    /// Create a new mock converter.
    pub fn new() -> Self {
        Self {
            conversions: Arc::new(RwLock::new(Vec::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            delays: Arc::new(RwLock::new(HashMap::new())),
            default_delay: Arc::new(RwLock::new(Duration::ZERO)),
            fail_missing: Arc::new(RwLock::new(false)),
        }
    }

    /// Get all recorded conversions.
    pub async fn recorded_conversions(&self) -> Vec<RecordedConversion> {
        self.conversions.read().await.clone()
    }

    /// Get the number of conversions performed.
    pub async fn conversion_count(&self) -> usize {
        self.conversions.read().await.len()
    }

    /// Make conversions of the given input path fail with the reason.
    pub async fn fail_path(&self, path: impl AsRef<Path>, reason: impl Into<String>) {
        self.failures
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), reason.into());
    }

    /// Delay conversions of the given input path.
    pub async fn delay_path(&self, path: impl AsRef<Path>, delay: Duration) {
        self.delays
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), delay);
    }

    /// Delay every conversion that has no per-path delay.
    pub async fn set_default_delay(&self, delay: Duration) {
        *self.default_delay.write().await = delay;
    }

    /// Make conversions fail with `InputNotFound` when the input file
    /// does not exist on disk.
    pub async fn set_fail_missing(&self, fail_missing: bool) {
        *self.fail_missing.write().await = fail_missing;
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    fn supported_formats(&self) -> &[ImageFormat] {
        ImageFormat::all()
    }

    fn validate(&self, input_path: &Path) -> Result<(), ConverterError> {
        if input_path.as_os_str().is_empty() {
            return Err(ConverterError::invalid_input("input path cannot be empty"));
        }
        Ok(())
    }

    async fn convert_single(
        &self,
        cancel: &CancellationToken,
        input_path: &Path,
        output_path: &Path,
        _format: ImageFormat,
    ) -> Result<(), ConverterError> {
        if cancel.is_cancelled() {
            return Err(ConverterError::Cancelled);
        }

        let delay = {
            let delays = self.delays.read().await;
            match delays.get(input_path) {
                Some(d) => *d,
                None => *self.default_delay.read().await,
            }
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failures.read().await.get(input_path).cloned();
        let outcome = if *self.fail_missing.read().await && !input_path.exists() {
            Err(ConverterError::InputNotFound {
                path: input_path.to_path_buf(),
            })
        } else {
            match failure {
                Some(reason) => Err(ConverterError::conversion_failed(reason, None)),
                None => Ok(()),
            }
        };

        self.conversions.write().await.push(RecordedConversion {
            input_path: input_path.to_path_buf(),
            output_path: output_path.to_path_buf(),
            success: outcome.is_ok(),
        });
        outcome
    }

    async fn convert_batch(
        &self,
        cancel: &CancellationToken,
        request: BatchRequest,
    ) -> Result<Vec<FileOutcome>, ConverterError> {
        let orchestrator = BatchOrchestrator::new(request.workers);
        let converter = self.clone();
        let job_cancel = cancel.clone();
        let format = request.format;
        orchestrator
            .run(cancel, &request, move |job| {
                let converter = converter.clone();
                let cancel = job_cancel.clone();
                async move {
                    converter
                        .convert_single(&cancel, &job.input_path, &job.output_path, format)
                        .await
                }
            })
            .await
    }
}
