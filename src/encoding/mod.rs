//! Feature encoding module
//!
//! Column layout constants and the one-hot encoder.

pub mod columns;
pub mod encoder;

// Re-export commonly used types
pub use columns::{CategoricalGroup, CATEGORICAL_GROUPS, FEATURE_COLUMNS, FEATURE_COUNT};
pub use encoder::{encode, unmatched_attributes, FeatureVector};
