pub mod batch;
pub mod config;
pub mod converter;
pub mod pool;
pub mod registry;
pub mod service;
pub mod testing;

pub use batch::BatchOrchestrator;
pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use converter::{
    BatchRequest, Converter, ConverterError, FileOutcome, ImageConverter, ImageConverterConfig,
    ImageFormat,
};
pub use pool::{Job, JobResult, WorkerPool};
pub use registry::{install_default_converters, ConverterRegistry, RegistryError};
pub use service::{
    BatchConversionOutcome, BatchConversionRequest, ConversionRequest, ConversionService,
    ServiceError,
};
