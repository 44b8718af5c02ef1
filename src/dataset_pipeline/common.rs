//! Common utilities module
//!
//! This module contains shared utilities used across the dataset pipeline.

pub mod error;
pub mod matrix;
pub mod timing;

pub use error::{ConversionError, Result};
pub use matrix::matrix_rows;
pub use timing::{PipelineTimings, StepTiming, Timer};
