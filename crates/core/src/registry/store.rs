use std::collections::HashMap;
use std::sync::{Arc, Once, PoisonError, RwLock};

use tracing::warn;

use crate::converter::Converter;

use super::error::RegistryError;

/// Thread-safe store mapping category names to converters.
///
/// There is no global instance; construct one and hand it to whoever
/// needs lookups. Registration failures during startup can be collected
/// with [`safe_register`](Self::safe_register) and surfaced later through
/// [`health_check`](Self::health_check) instead of aborting startup.
pub struct ConverterRegistry {
    converters: RwLock<HashMap<String, Arc<dyn Converter>>>,
    init_once: Once,
    init_errors: RwLock<Vec<RegistryError>>,
}

impl ConverterRegistry {
    /// Creates an empty, uninitialized registry.
    pub fn new() -> Self {
        Self {
            converters: RwLock::new(HashMap::new()),
            init_once: Once::new(),
            init_errors: RwLock::new(Vec::new()),
        }
    }

    /// Marks initialization complete. Idempotent.
    pub fn mark_initialized(&self) {
        self.init_once.call_once(|| {});
    }

    /// Whether [`mark_initialized`](Self::mark_initialized) has run.
    pub fn is_initialized(&self) -> bool {
        self.init_once.is_completed()
    }

    /// Returns a copy of the errors recorded during initialization.
    pub fn initialization_errors(&self) -> Vec<RegistryError> {
        self.init_errors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Records an initialization error.
    pub fn add_initialization_error(&self, err: RegistryError) {
        self.init_errors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(err);
    }

    /// Registers a converter, rejecting duplicates.
    pub fn register(
        &self,
        category: &str,
        converter: Arc<dyn Converter>,
    ) -> Result<(), RegistryError> {
        if category.is_empty() {
            return Err(RegistryError::EmptyCategory);
        }

        let mut converters = self
            .converters
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if converters.contains_key(category) {
            return Err(RegistryError::AlreadyExists {
                category: category.to_string(),
            });
        }
        converters.insert(category.to_string(), converter);
        Ok(())
    }

    /// Like [`register`](Self::register), but records the error in the
    /// initialization error list instead of returning it.
    pub fn safe_register(&self, category: &str, converter: Arc<dyn Converter>) {
        if let Err(e) = self.register(category, converter) {
            warn!(category, error = %e, "converter registration failed");
            self.add_initialization_error(e);
        }
    }

    /// Registers a converter, replacing any existing one.
    pub fn register_or_replace(
        &self,
        category: &str,
        converter: Arc<dyn Converter>,
    ) -> Result<(), RegistryError> {
        if category.is_empty() {
            return Err(RegistryError::EmptyCategory);
        }
        self.converters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(category.to_string(), converter);
        Ok(())
    }

    /// Removes a converter.
    pub fn unregister(&self, category: &str) -> Result<(), RegistryError> {
        let mut converters = self
            .converters
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if converters.remove(category).is_none() {
            return Err(RegistryError::NotFound {
                category: category.to_string(),
                available: sorted_keys(&converters),
            });
        }
        Ok(())
    }

    /// Looks up a converter by category.
    ///
    /// A missing converter lists the available categories in the error.
    /// Initialization errors never poison lookups of converters that did
    /// register; [`health_check`](Self::health_check) reports them.
    pub fn get(&self, category: &str) -> Result<Arc<dyn Converter>, RegistryError> {
        if !self.is_initialized() {
            return Err(RegistryError::NotInitialized);
        }

        let converters = self
            .converters
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        match converters.get(category) {
            Some(converter) => Ok(Arc::clone(converter)),
            None => Err(RegistryError::NotFound {
                category: category.to_string(),
                available: sorted_keys(&converters),
            }),
        }
    }

    /// Whether a converter exists for the category.
    pub fn exists(&self, category: &str) -> bool {
        self.converters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(category)
    }

    /// All registered categories, sorted.
    pub fn all_categories(&self) -> Vec<String> {
        sorted_keys(
            &self
                .converters
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Number of registered converters.
    pub fn count(&self) -> usize {
        self.converters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Removes all converters. Initialization state is untouched.
    pub fn clear(&self) {
        self.converters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Verifies the registry is initialized, error-free, and non-empty.
    pub fn health_check(&self) -> Result<(), RegistryError> {
        if !self.is_initialized() {
            return Err(RegistryError::NotInitialized);
        }

        let errors = self.initialization_errors();
        if !errors.is_empty() {
            let details = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(RegistryError::Initialization {
                count: errors.len(),
                details,
            });
        }

        if self.count() == 0 {
            return Err(RegistryError::Empty);
        }

        Ok(())
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted_keys(converters: &HashMap<String, Arc<dyn Converter>>) -> Vec<String> {
    let mut keys: Vec<String> = converters.keys().cloned().collect();
    keys.sort();
    keys
}
