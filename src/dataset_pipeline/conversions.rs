//! Pipeline conversions module
//!
//! This module contains the orchestration logic that turns a capture folder
//! into packed assets and a manifest.

mod dataset_converter;

#[cfg(test)]
mod tests;

pub use dataset_converter::{ConversionReport, DatasetConverter};
