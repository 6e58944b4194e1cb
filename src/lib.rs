//! Dengue Predictor
//!
//! Scores dengue infection risk from patient lab results and residence,
//! explains the result, and offers an AI health assistant over HTTP.
//!
//! # Architecture
//!
//! - **Inference**: feature encoding, logistic classifier, risk bands
//! - **Assistant**: prompt assembly and pluggable text generators
//! - **Cases**: optional vector store of logged predictions
//! - **Surfaces**: HTTP API, split-topology gateway, CLI

pub mod errors;
pub mod types;

// Inference pipeline
pub mod encoding;
pub mod model;
pub mod prediction;

// Assistant
pub mod chat;
pub mod llm;

// Case store
pub mod cases;
pub mod embedding;

// Surfaces
pub mod cli;
pub mod doctor;
pub mod gateway;
pub mod server;
pub mod telemetry;

// Re-export commonly used types
pub use errors::{PredictorError, Result};
