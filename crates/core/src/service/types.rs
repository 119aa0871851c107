//! Wire types for the conversion service.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::converter::{BatchRequest, FileOutcome, ImageFormat};

/// A single-file conversion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    /// File to convert.
    pub input_path: PathBuf,
    /// Where to write the result; defaults to a sibling of the input.
    #[serde(default)]
    pub output_path: Option<PathBuf>,
    /// Target format.
    pub format: ImageFormat,
    /// Converter category, e.g. `"img"`.
    pub category: String,
    /// Format-specific options.
    #[serde(default)]
    pub options: HashMap<String, String>,
}

/// A batch conversion request addressed to a converter category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchConversionRequest {
    /// Converter category, e.g. `"img"`.
    pub category: String,
    /// The batch itself.
    #[serde(flatten)]
    pub batch: BatchRequest,
}

/// Aggregate outcome of a batch conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchConversionOutcome {
    /// True only when every file succeeded.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Number of files in the batch.
    pub total_files: usize,
    /// Files that converted successfully.
    pub success_count: usize,
    /// Files that did not.
    pub failure_count: usize,
    /// Per-file outcomes, in input order.
    pub results: Vec<FileOutcome>,
    /// Call-level error text, empty on success.
    #[serde(default)]
    pub error: String,
}

/// The formats one converter category can produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedFormats {
    /// Converter category.
    pub category: String,
    /// Output formats it supports.
    pub formats: Vec<ImageFormat>,
}
