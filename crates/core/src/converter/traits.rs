use async_trait::async_trait;
use std::path::Path;
use tokio_util::sync::CancellationToken;

use super::error::ConverterError;
use super::types::{BatchRequest, FileOutcome, ImageFormat};

/// A file converter for one media category.
///
/// Implementations are cheap to clone behind an `Arc` and safe to call
/// concurrently; batch conversion fans work out across a bounded worker
/// pool internally.
#[async_trait]
pub trait Converter: Send + Sync + std::fmt::Debug {
    /// Short human-readable converter name, used in logs and health checks.
    fn name(&self) -> &str;

    /// Output formats this converter can produce.
    fn supported_formats(&self) -> &[ImageFormat];

    /// Checks that the input file exists and carries a supported extension.
    fn validate(&self, input_path: &Path) -> Result<(), ConverterError>;

    /// Converts a single file, honoring the cancellation token.
    async fn convert_single(
        &self,
        cancel: &CancellationToken,
        input_path: &Path,
        output_path: &Path,
        format: ImageFormat,
    ) -> Result<(), ConverterError>;

    /// Converts a batch of files concurrently.
    ///
    /// Returns one [`FileOutcome`] per input, in input order, each in a
    /// terminal state. Fails as a whole only for conditions that make the
    /// entire call unusable, such as an empty input list or a cancellation
    /// observed before any work started.
    async fn convert_batch(
        &self,
        cancel: &CancellationToken,
        request: BatchRequest,
    ) -> Result<Vec<FileOutcome>, ConverterError>;
}
