//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use super::error::ConverterError;

/// Terminal message for a slot whose conversion succeeded.
pub const MSG_SUCCESS: &str = "conversion successful";

/// Terminal message for a slot whose job could not be submitted because
/// the pool was cancelled or closed.
pub const MSG_NOT_SUBMITTED: &str = "worker pool was cancelled or closed";

/// Terminal message for a slot whose job was dispatched but whose result
/// never came back (abandoned under cancellation).
pub const MSG_NOT_PROCESSED: &str = "job was not processed by worker pool";

/// Target image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    /// WebP
    Webp,
    /// JPEG
    Jpeg,
    /// Portable Network Graphics
    Png,
    /// Graphics Interchange Format
    Gif,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Webp => "webp",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }

    /// All supported output formats.
    pub fn all() -> &'static [ImageFormat] {
        &[Self::Webp, Self::Jpeg, Self::Png, Self::Gif]
    }
}

impl FromStr for ImageFormat {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "webp" => Ok(Self::Webp),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "gif" => Ok(Self::Gif),
            other => Err(ConverterError::UnsupportedOutputFormat {
                format: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// A batch conversion request as seen by a converter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    /// Files to convert, in caller order.
    pub input_paths: Vec<PathBuf>,
    /// Directory receiving the converted files.
    pub output_dir: PathBuf,
    /// Target format for every file in the batch.
    pub format: ImageFormat,
    /// Whether to mirror the input directory structure under the output
    /// directory. Currently both layouts are flat.
    #[serde(default)]
    pub keep_structure: bool,
    /// Number of concurrent workers; zero means the pool default.
    #[serde(default)]
    pub workers: usize,
}

/// The per-input record in a batch result array.
///
/// Created with `success = false` before dispatch and mutated exactly once
/// to its terminal state; every slot carries a non-empty message by the
/// time the batch call returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOutcome {
    /// Input file path.
    pub input_path: PathBuf,
    /// Computed output file path.
    pub output_path: PathBuf,
    /// Whether the conversion succeeded.
    pub success: bool,
    /// Human-readable terminal message.
    pub message: String,
    /// Error text, empty on success.
    pub error: String,
}

impl FileOutcome {
    /// Creates a pre-dispatch slot.
    pub fn pending(input_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            input_path,
            output_path,
            success: false,
            message: String::new(),
            error: String::new(),
        }
    }

    /// Whether the slot has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        !self.message.is_empty()
    }

    /// Marks the slot as successfully converted.
    pub fn mark_success(&mut self) {
        self.success = true;
        self.message = MSG_SUCCESS.to_string();
        self.error.clear();
    }

    /// Marks the slot as failed with the given conversion error.
    pub fn mark_failed(&mut self, err: &ConverterError) {
        self.success = false;
        self.message = format!("conversion failed: {}", err);
        self.error = err.to_string();
    }

    /// Marks the slot as never submitted (cancellation before dispatch).
    pub fn mark_not_submitted(&mut self) {
        self.success = false;
        self.message = MSG_NOT_SUBMITTED.to_string();
    }

    /// Marks the slot as dispatched but never resolved (result lost).
    pub fn mark_not_processed(&mut self) {
        self.success = false;
        self.message = MSG_NOT_PROCESSED.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_extension() {
        assert_eq!(ImageFormat::Webp.extension(), "webp");
        assert_eq!(ImageFormat::Jpeg.extension(), "jpeg");
        assert_eq!(ImageFormat::Png.extension(), "png");
        assert_eq!(ImageFormat::Gif.extension(), "gif");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("webp".parse::<ImageFormat>().unwrap(), ImageFormat::Webp);
        assert_eq!("JPG".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert!(matches!(
            "tiff".parse::<ImageFormat>(),
            Err(ConverterError::UnsupportedOutputFormat { .. })
        ));
    }

    #[test]
    fn test_format_serde_round_trip() {
        let json = serde_json::to_string(&ImageFormat::Webp).unwrap();
        assert_eq!(json, "\"webp\"");
        let parsed: ImageFormat = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ImageFormat::Webp);
    }

    #[test]
    fn test_slot_terminal_transitions() {
        let mut slot = FileOutcome::pending("/a.png".into(), "/out/a.webp".into());
        assert!(!slot.is_terminal());
        assert!(!slot.success);

        slot.mark_success();
        assert!(slot.is_terminal());
        assert!(slot.success);
        assert_eq!(slot.message, MSG_SUCCESS);
        assert!(slot.error.is_empty());

        let mut slot = FileOutcome::pending("/a.png".into(), "/out/a.webp".into());
        slot.mark_failed(&ConverterError::conversion_failed("boom", None));
        assert!(slot.is_terminal());
        assert!(!slot.success);
        assert!(slot.message.contains("boom"));
        assert!(!slot.error.is_empty());
    }

    #[test]
    fn test_batch_request_deserialize_defaults() {
        let json = r#"{
            "inputPaths": ["/a.png"],
            "outputDir": "/out",
            "format": "webp"
        }"#;
        let request: BatchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.workers, 0);
        assert!(!request.keep_structure);
    }
}
