//! Converter registry.
//!
//! Maps category names (e.g. `"img"`) to [`Converter`] implementations.
//! Registries are plain values handed around explicitly; callers that
//! want the stock converter set call [`install_default_converters`].

mod error;
mod store;

pub use error::RegistryError;
pub use store::ConverterRegistry;

use std::sync::Arc;

use tracing::info;

use crate::converter::{Converter, ImageConverter, ImageConverterConfig, IMAGE_CATEGORY};

/// Installs the stock converters and marks the registry initialized.
///
/// Registration failures are recorded as initialization errors rather
/// than returned, so a partially healthy registry still serves the
/// converters that did install.
pub fn install_default_converters(registry: &ConverterRegistry, config: &ImageConverterConfig) {
    let image: Arc<dyn Converter> = Arc::new(ImageConverter::new(config.clone()));
    registry.safe_register(IMAGE_CATEGORY, image);
    registry.mark_initialized();
    info!(
        categories = ?registry.all_categories(),
        "converter registry initialized"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_default_converters() {
        let registry = ConverterRegistry::new();
        install_default_converters(&registry, &ImageConverterConfig::default());

        assert!(registry.is_initialized());
        assert!(registry.health_check().is_ok());
        assert!(registry.get(IMAGE_CATEGORY).is_ok());
    }
}
