//! Types for the worker pool.

use std::collections::HashMap;
use std::path::PathBuf;

/// A single unit of conversion work, immutable once created.
#[derive(Debug, Clone)]
pub struct Job {
    /// Input file path.
    pub input_path: PathBuf,
    /// Output file path.
    pub output_path: PathBuf,
    /// Format-specific options (opaque key/value bag).
    pub options: HashMap<String, String>,
}

impl Job {
    /// Creates a new job with no options.
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            options: HashMap::new(),
        }
    }

    /// Adds an option to the job.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// The outcome of executing one job.
///
/// Produced exactly once per dispatched job, or never if the result was
/// abandoned under cancellation.
#[derive(Debug)]
pub struct JobResult<E> {
    /// The job that was executed.
    pub job: Job,
    /// Success, or the error the processing function returned.
    pub outcome: Result<(), E>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_builder() {
        let job = Job::new("/in/a.png", "/out/a.webp").with_option("format", "webp");

        assert_eq!(job.input_path, PathBuf::from("/in/a.png"));
        assert_eq!(job.output_path, PathBuf::from("/out/a.webp"));
        assert_eq!(job.options.get("format").map(String::as_str), Some("webp"));
    }
}
