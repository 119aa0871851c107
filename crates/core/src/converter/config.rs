use serde::{Deserialize, Serialize};

/// Configuration for the ImageMagick-backed image converter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConverterConfig {
    /// Path or name of the `magick` binary.
    #[serde(default = "default_magick_path")]
    pub magick_path: String,

    /// Timeout for a single conversion, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra arguments appended before the output path, e.g. `-quality 85`.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_magick_path() -> String {
    "magick".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for ImageConverterConfig {
    fn default() -> Self {
        Self {
            magick_path: default_magick_path(),
            timeout_secs: default_timeout_secs(),
            extra_args: Vec::new(),
        }
    }
}

impl ImageConverterConfig {
    pub fn with_magick_path(mut self, path: impl Into<String>) -> Self {
        self.magick_path = path.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ImageConverterConfig::default();
        assert_eq!(config.magick_path, "magick");
        assert_eq!(config.timeout_secs, 300);
        assert!(config.extra_args.is_empty());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ImageConverterConfig =
            toml::from_str("timeout_secs = 30").unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.magick_path, "magick");
    }

    #[test]
    fn test_builders() {
        let config = ImageConverterConfig::default()
            .with_magick_path("/usr/local/bin/magick")
            .with_timeout_secs(10)
            .with_extra_args(vec!["-quality".into(), "85".into()]);
        assert_eq!(config.magick_path, "/usr/local/bin/magick");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.extra_args.len(), 2);
    }
}
