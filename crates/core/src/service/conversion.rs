//! Conversion service.

use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::batch::output_path;
use crate::converter::{ConverterError, FileOutcome};
use crate::registry::ConverterRegistry;

use super::error::ServiceError;
use super::types::{
    BatchConversionOutcome, BatchConversionRequest, ConversionRequest, SupportedFormats,
};

/// Front door for conversions: resolves converters through the registry
/// and aggregates batch results.
pub struct ConversionService {
    registry: Arc<ConverterRegistry>,
}

impl ConversionService {
    /// Creates a service backed by the given registry.
    pub fn new(registry: Arc<ConverterRegistry>) -> Self {
        Self { registry }
    }

    /// Converts one file.
    ///
    /// When the request carries no output path, the result lands next to
    /// the input with the target format's extension.
    pub async fn convert_file(
        &self,
        cancel: &CancellationToken,
        request: ConversionRequest,
    ) -> Result<FileOutcome, ServiceError> {
        if cancel.is_cancelled() {
            return Err(ConverterError::Cancelled.into());
        }
        if request.input_path.as_os_str().is_empty() {
            return Err(ServiceError::invalid_request("input path cannot be empty"));
        }
        if request.category.is_empty() {
            return Err(ServiceError::invalid_request("category cannot be empty"));
        }

        let converter = self.registry.get(&request.category)?;

        let out = match request.output_path {
            Some(path) => path,
            None => {
                let dir = request.input_path.parent().unwrap_or(Path::new("."));
                output_path(&request.input_path, dir, request.format, false)
            }
        };

        converter
            .convert_single(cancel, &request.input_path, &out, request.format)
            .await?;

        let mut outcome = FileOutcome::pending(request.input_path, out);
        outcome.mark_success();
        Ok(outcome)
    }

    /// Converts a batch of files and aggregates the per-file outcomes.
    pub async fn convert_batch(
        &self,
        cancel: &CancellationToken,
        request: BatchConversionRequest,
    ) -> Result<BatchConversionOutcome, ServiceError> {
        if cancel.is_cancelled() {
            return Err(ConverterError::Cancelled.into());
        }

        let converter = self.registry.get(&request.category)?;
        let results = converter.convert_batch(cancel, request.batch).await?;

        let total_files = results.len();
        let success_count = results.iter().filter(|r| r.success).count();
        let failure_count = total_files - success_count;

        let message = format!(
            "Batch conversion completed: {} successful, {} failed out of {} files",
            success_count, failure_count, total_files
        );
        info!(success_count, failure_count, total_files, "batch finished");

        Ok(BatchConversionOutcome {
            success: failure_count == 0,
            message,
            total_files,
            success_count,
            failure_count,
            results,
            error: String::new(),
        })
    }

    /// Lists the output formats of every registered converter category.
    pub fn supported_formats(&self) -> Vec<SupportedFormats> {
        self.registry
            .all_categories()
            .into_iter()
            .filter_map(|category| {
                let converter = self.registry.get(&category).ok()?;
                Some(SupportedFormats {
                    formats: converter.supported_formats().to_vec(),
                    category,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{BatchRequest, ImageFormat};
    use crate::testing::MockConverter;
    use std::path::PathBuf;

    fn service_with_mock() -> (ConversionService, MockConverter) {
        let mock = MockConverter::new();
        let registry = ConverterRegistry::new();
        registry
            .register("img", Arc::new(mock.clone()))
            .expect("register mock");
        registry.mark_initialized();
        (ConversionService::new(Arc::new(registry)), mock)
    }

    #[tokio::test]
    async fn test_convert_file_defaults_output_next_to_input() {
        let (service, mock) = service_with_mock();
        let cancel = CancellationToken::new();
        let outcome = service
            .convert_file(
                &cancel,
                ConversionRequest {
                    input_path: PathBuf::from("/photos/cat.png"),
                    output_path: None,
                    format: ImageFormat::Webp,
                    category: "img".to_string(),
                    options: Default::default(),
                },
            )
            .await
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.output_path, PathBuf::from("/photos/cat.webp"));
        assert_eq!(mock.conversion_count().await, 1);
    }

    #[tokio::test]
    async fn test_convert_file_unknown_category() {
        let (service, _mock) = service_with_mock();
        let cancel = CancellationToken::new();
        let err = service
            .convert_file(
                &cancel,
                ConversionRequest {
                    input_path: PathBuf::from("/a.png"),
                    output_path: None,
                    format: ImageFormat::Png,
                    category: "video".to_string(),
                    options: Default::default(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Registry(_)));
    }

    #[tokio::test]
    async fn test_convert_batch_aggregates_counts() {
        let (service, mock) = service_with_mock();
        mock.fail_path("/b.png", "decode error").await;
        let dir = tempfile::tempdir().unwrap();
        let cancel = CancellationToken::new();

        let outcome = service
            .convert_batch(
                &cancel,
                BatchConversionRequest {
                    category: "img".to_string(),
                    batch: BatchRequest {
                        input_paths: vec![
                            PathBuf::from("/a.png"),
                            PathBuf::from("/b.png"),
                            PathBuf::from("/c.png"),
                        ],
                        output_dir: dir.path().to_path_buf(),
                        format: ImageFormat::Webp,
                        keep_structure: false,
                        workers: 2,
                    },
                },
            )
            .await
            .unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.total_files, 3);
        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.failure_count, 1);
        assert_eq!(
            outcome.message,
            "Batch conversion completed: 2 successful, 1 failed out of 3 files"
        );
    }

    #[tokio::test]
    async fn test_supported_formats() {
        let (service, _mock) = service_with_mock();
        let formats = service.supported_formats();
        assert_eq!(formats.len(), 1);
        assert_eq!(formats[0].category, "img");
        assert_eq!(formats[0].formats.len(), 4);
    }
}
