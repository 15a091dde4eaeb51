//! Common types used throughout the stimulus and verification tools.
//!
//! Currently this holds the error enums for each concern: codec, configuration,
//! stimulus generation, metric computation and verification.

/// Error types for every fallible operation in the crate.
pub mod error;

pub use error::{CodecError, ConfigError, MetricError, StimulusError, VerifyError};
