use serde::{Deserialize, Serialize};

use crate::converter::ImageConverterConfig;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Image converter settings.
    #[serde(default)]
    pub converter: ImageConverterConfig,

    /// Batch processing settings.
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Batch processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Worker count used when a request does not name one.
    #[serde(default = "default_workers")]
    pub default_workers: usize,

    /// Upper bound on the per-request worker count.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
}

fn default_workers() -> usize {
    4
}

fn default_max_workers() -> usize {
    32
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            default_workers: default_workers(),
            max_workers: default_max_workers(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.batch.default_workers, 4);
        assert_eq!(config.batch.max_workers, 32);
        assert_eq!(config.converter.magick_path, "magick");
    }
}
