use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - batch worker bounds are coherent
/// - converter binary path is set and timeout is non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.converter.magick_path.is_empty() {
        return Err(ConfigError::ValidationError(
            "converter.magick_path cannot be empty".to_string(),
        ));
    }

    if config.batch.max_workers == 0 {
        return Err(ConfigError::ValidationError(
            "batch.max_workers cannot be 0".to_string(),
        ));
    }

    if config.batch.default_workers > config.batch.max_workers {
        return Err(ConfigError::ValidationError(format!(
            "batch.default_workers ({}) cannot exceed batch.max_workers ({})",
            config.batch.default_workers, config.batch.max_workers
        )));
    }

    if config.converter.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "converter.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BatchConfig;

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_zero_max_workers_fails() {
        let config = Config {
            batch: BatchConfig {
                default_workers: 0,
                max_workers: 0,
            },
            ..Config::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_workers_above_max_fails() {
        let config = Config {
            batch: BatchConfig {
                default_workers: 64,
                max_workers: 32,
            },
            ..Config::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_empty_magick_path_fails() {
        let mut config = Config::default();
        config.converter.magick_path = String::new();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = Config::default();
        config.converter.timeout_secs = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
