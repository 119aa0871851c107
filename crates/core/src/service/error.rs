use thiserror::Error;

use crate::converter::ConverterError;
use crate::registry::RegistryError;

/// Errors produced by the conversion service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed before any lookup or conversion ran.
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// Converter lookup failed.
    #[error("converter not found: {0}")]
    Registry(#[from] RegistryError),

    /// The conversion itself failed at the call level.
    #[error("conversion failed: {0}")]
    Converter(#[from] ConverterError),
}

impl ServiceError {
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }
}
