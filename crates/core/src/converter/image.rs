//! ImageMagick-based image converter.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::batch::{BatchOrchestrator, OPT_FORMAT};

use super::config::ImageConverterConfig;
use super::error::ConverterError;
use super::traits::Converter;
use super::types::{BatchRequest, FileOutcome, ImageFormat};

/// Registry category for the image converter.
pub const CATEGORY: &str = "img";

/// Input extensions the converter accepts, lowercase without the dot.
static SUPPORTED_INPUT_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["jpg", "jpeg", "png", "gif", "webp", "bmp", "tiff", "tif"]
        .into_iter()
        .collect()
});

/// Converts images by delegating to the `magick` command line tool.
///
/// Cheap to clone; batch conversion clones one instance per worker.
#[derive(Debug, Clone)]
pub struct ImageConverter {
    config: ImageConverterConfig,
}

impl ImageConverter {
    /// Creates a new image converter with the given configuration.
    pub fn new(config: ImageConverterConfig) -> Self {
        Self { config }
    }

    /// Creates a converter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ImageConverterConfig::default())
    }

    /// Builds the magick argument list. The output extension selects the
    /// target format.
    fn build_args(&self, input_path: &Path, output_path: &Path) -> Vec<String> {
        let mut args = vec![input_path.to_string_lossy().to_string()];
        args.extend(self.config.extra_args.iter().cloned());
        args.push(output_path.to_string_lossy().to_string());
        args
    }

    /// Spawns magick and waits for it, bounded by the configured timeout.
    async fn run_magick(
        &self,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<(), ConverterError> {
        let args = self.build_args(input_path, output_path);
        debug!(
            input = %input_path.display(),
            output = %output_path.display(),
            "running magick"
        );

        let child = Command::new(&self.config.magick_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ConverterError::MagickNotFound {
                        path: self.config.magick_path.clone().into(),
                    }
                } else {
                    ConverterError::Io(e)
                }
            })?;

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let output = match timeout(timeout_duration, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(ConverterError::Io(e)),
            // Dropping the child kills the process.
            Err(_) => {
                return Err(ConverterError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                })
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ConverterError::conversion_failed(
                format!("magick exited with code: {:?}", output.status.code()),
                if stderr.is_empty() { None } else { Some(stderr) },
            ));
        }

        // Verify the output actually materialized.
        if tokio::fs::metadata(output_path).await.is_err() {
            return Err(ConverterError::OutputMissing {
                path: output_path.to_path_buf(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Converter for ImageConverter {
    fn name(&self) -> &str {
        "image"
    }

    fn supported_formats(&self) -> &[ImageFormat] {
        ImageFormat::all()
    }

    fn validate(&self, input_path: &Path) -> Result<(), ConverterError> {
        if input_path.as_os_str().is_empty() {
            return Err(ConverterError::invalid_input("input path cannot be empty"));
        }

        let Some(ext) = input_path.extension().and_then(|e| e.to_str()) else {
            return Err(ConverterError::invalid_input("input file has no extension"));
        };
        let ext = ext.to_ascii_lowercase();
        if !SUPPORTED_INPUT_EXTENSIONS.contains(ext.as_str()) {
            return Err(ConverterError::UnsupportedInputFormat { extension: ext });
        }

        if !input_path.exists() {
            return Err(ConverterError::InputNotFound {
                path: input_path.to_path_buf(),
            });
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

        self.validate(input_path)?;

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|_| {
                    ConverterError::OutputDirectoryFailed {
                        path: parent.to_path_buf(),
                    }
                })?;
            }
        }

        // A conversion that has started runs to completion; only the
        // pre-dispatch check races the cancellation signal.
        self.run_magick(input_path, output_path).await
    }

    async fn convert_batch(
        &self,
        cancel: &CancellationToken,
        request: BatchRequest,
    ) -> Result<Vec<FileOutcome>, ConverterError> {
        let orchestrator = BatchOrchestrator::new(request.workers);
        let converter = self.clone();
        let job_cancel = cancel.clone();
        orchestrator
            .run(cancel, &request, move |job| {
                let converter = converter.clone();
                let cancel = job_cancel.clone();
                async move {
                    let format = job
                        .options
                        .get(OPT_FORMAT)
                        .map(String::as_str)
                        .unwrap_or("webp")
                        .parse::<ImageFormat>()?;
                    converter
                        .convert_single(&cancel, &job.input_path, &job.output_path, format)
                        .await
                }
            })
            .await
    }
}
