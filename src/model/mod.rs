//! Model artifacts
//!
//! Formats, loading and validation of the three artifacts produced by the
//! offline training step: the fitted regressor, the categorical encoders
//! and the ordered training feature names.

pub mod artifacts;
pub mod encoder;
pub mod error;
pub mod regressor;

pub use artifacts::{EncoderMap, ModelArtifacts};
