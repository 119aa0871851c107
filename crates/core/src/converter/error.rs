//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during conversion.
///
/// Two tiers share this type: fatal-to-call errors (`NoInputs`,
/// `EmptyOutputDir`, `OutputDirectoryFailed`, `Cancelled`) abort a batch
/// before any dispatch; everything else is a per-job failure that is
/// captured in that input's result slot and never aborts sibling jobs.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// ImageMagick binary not found.
    #[error("ImageMagick not found at path: {path}")]
    MagickNotFound { path: PathBuf },

    /// Batch request carried no input paths.
    #[error("no input paths provided")]
    NoInputs,

    /// Batch request carried an empty output directory.
    #[error("output directory cannot be empty")]
    EmptyOutputDir,

    /// Output directory does not exist and could not be created.
    #[error("failed to create output directory: {path}")]
    OutputDirectoryFailed { path: PathBuf },

    /// Input file not found or not readable.
    #[error("input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Input path failed validation before any work started.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Input file extension is not a supported image format.
    #[error("unsupported input file extension: {extension}")]
    UnsupportedInputFormat { extension: String },

    /// Requested output format is not supported.
    #[error("unsupported output format: {format}")]
    UnsupportedOutputFormat { format: String },

    /// Conversion process failed. The slot message supplies the
    /// "conversion failed:" prefix, so the display is the bare reason.
    #[error("{reason}")]
    ConversionFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// Conversion ran but the output file was never created.
    #[error("output file not created: {path}")]
    OutputMissing { path: PathBuf },

    /// Conversion timed out.
    #[error("conversion timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Operation was cancelled before any work was dispatched.
    #[error("operation cancelled")]
    Cancelled,

    /// I/O error during conversion.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConverterError {
    /// Creates a new conversion failed error with stderr output.
    pub fn conversion_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ConversionFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Creates a new invalid input error.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Whether this error aborts a batch call before any dispatch, as
    /// opposed to being captured in a single input's slot.
    pub fn is_fatal_to_call(&self) -> bool {
        matches!(
            self,
            Self::NoInputs
                | Self::EmptyOutputDir
                | Self::OutputDirectoryFailed { .. }
                | Self::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConverterError::NoInputs;
        assert_eq!(err.to_string(), "no input paths provided");

        let err = ConverterError::InputNotFound {
            path: PathBuf::from("/missing.png"),
        };
        assert_eq!(err.to_string(), "input file not found: /missing.png");

        let err = ConverterError::conversion_failed("bad pixels", None);
        assert_eq!(err.to_string(), "bad pixels");
    }

    #[test]
    fn test_fatal_tier() {
        assert!(ConverterError::NoInputs.is_fatal_to_call());
        assert!(ConverterError::Cancelled.is_fatal_to_call());
        assert!(!ConverterError::InputNotFound {
            path: PathBuf::from("/a")
        }
        .is_fatal_to_call());
        assert!(!ConverterError::conversion_failed("x", None).is_fatal_to_call());
    }
}
