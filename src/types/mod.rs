//! Type definitions module
//!
//! Request schemas and domain records shared by the encoder, the services
//! and the HTTP layer.

pub mod messages;
pub mod patient;

// Re-export commonly used types
pub use messages::{ChatMessage, ChatRequest, ChatResponse, ChatRole, FieldValue, RiskContext};
pub use patient::{AgeInput, BinaryInput, Gender, PatientRecord, PredictRequest, REQUIRED_FIELDS};
