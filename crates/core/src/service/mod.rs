//! High-level conversion service over the registry.

mod conversion;
mod error;
mod types;

pub use conversion::ConversionService;
pub use error::ServiceError;
pub use types::{
    BatchConversionOutcome, BatchConversionRequest, ConversionRequest, SupportedFormats,
};
