use thiserror::Error;

/// Errors produced by the converter registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Registration or lookup used an empty category string.
    #[error("category cannot be empty")]
    EmptyCategory,

    /// A converter is already registered under this category.
    #[error("converter for category '{category}' already exists")]
    AlreadyExists { category: String },

    /// No converter registered under this category.
    #[error("converter for category '{category}' not found. Available: {available:?}")]
    NotFound {
        category: String,
        available: Vec<String>,
    },

    /// The registry was used before initialization completed.
    #[error("registry is not initialized")]
    NotInitialized,

    /// Converter installation recorded one or more errors.
    #[error("registry has {count} initialization error(s): {details}")]
    Initialization { count: usize, details: String },

    /// The registry holds no converters at all.
    #[error("no converters registered")]
    Empty,
}
