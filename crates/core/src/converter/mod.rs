//! File conversion capability layer.
//!
//! [`Converter`] is the seam between callers and concrete codecs: it
//! exposes validation, single-file conversion, and concurrent batch
//! conversion. The one production implementation, [`ImageConverter`],
//! shells out to ImageMagick.

mod config;
mod error;
mod image;
mod traits;
mod types;

pub use config::ImageConverterConfig;
pub use error::ConverterError;
pub use image::{ImageConverter, CATEGORY as IMAGE_CATEGORY};
pub use traits::Converter;
pub use types::{
    BatchRequest, FileOutcome, ImageFormat, MSG_NOT_PROCESSED, MSG_NOT_SUBMITTED, MSG_SUCCESS,
};
