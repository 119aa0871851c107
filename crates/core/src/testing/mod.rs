//! Test doubles for the conversion stack.

mod mock_converter;

pub use mock_converter::{MockConverter, RecordedConversion};
