//! Chat message types
//!
//! Wire schema of `POST /chat` and the conversation entries it carries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Speaker of a conversation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    #[serde(alias = "model")]
    Assistant,
}

impl ChatRole {
    /// Label used when replaying history into a prompt
    pub fn label(&self) -> &'static str {
        match self {
            ChatRole::User => "User",
            ChatRole::Assistant => "Assistant",
        }
    }
}

/// One conversation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Loosely-typed display value from a client-side risk summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Risk assessment echoed back by the client to personalize chat answers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskContext {
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default)]
    pub age: Option<FieldValue>,
    #[serde(default)]
    pub gender: Option<FieldValue>,
    #[serde(default)]
    pub ns1: Option<FieldValue>,
    #[serde(default)]
    pub igg: Option<FieldValue>,
    #[serde(default)]
    pub igm: Option<FieldValue>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
}

impl RiskContext {
    /// No field was supplied, as with a `{}` body
    pub fn is_empty(&self) -> bool {
        *self == RiskContext::default()
    }
}

/// Wire schema of `POST /chat`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
    #[serde(default)]
    pub risk_assessment: Option<RiskContext>,
}

/// Response of `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub conversation_history: Vec<ChatMessage>,
}
