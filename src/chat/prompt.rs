//! Prompt assembly for the dengue assistant

use crate::types::{ChatMessage, FieldValue, RiskContext};
use std::fmt::Write;

pub const SYSTEM_CONTEXT: &str = "You are a helpful medical AI assistant specializing in dengue fever.
You provide accurate, compassionate health advice while emphasizing the importance of professional medical care.

Key Guidelines:
- Provide clear, actionable health advice
- Always recommend consulting healthcare professionals for serious symptoms
- Be empathetic and supportive
- Include preventive measures when relevant
- Format your responses with clear structure using bullet points when appropriate
";

const UNKNOWN: &str = "Unknown";

fn field(value: &Option<FieldValue>) -> String {
    value
        .as_ref()
        .map(FieldValue::to_string)
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(UNKNOWN)
}

/// Patient assessment block appended to the system context
pub fn risk_context(risk: &RiskContext) -> String {
    let probability = risk
        .probability
        .map(|p| format!("{}%", (p * 100.0).trunc() as i64))
        .unwrap_or_else(|| UNKNOWN.to_string());

    format!(
        "
Current Patient Assessment:
- Risk Level: {}
- Risk Probability: {}
- Age: {} years
- Gender: {}
- Test Results: NS1 {}, IgG {}, IgM {}
- Location: {}, {}

Based on this assessment, provide personalized advice.
",
        text(&risk.risk_level),
        probability,
        field(&risk.age),
        field(&risk.gender),
        field(&risk.ns1),
        field(&risk.igg),
        field(&risk.igm),
        text(&risk.area),
        text(&risk.district),
    )
}

/// System context, optional assessment, prior turns, then the new message
pub fn build_prompt(history: &[ChatMessage], risk: Option<&RiskContext>, message: &str) -> String {
    let mut prompt = String::from(SYSTEM_CONTEXT);

    if let Some(risk) = risk.filter(|r| !r.is_empty()) {
        prompt.push_str(&risk_context(risk));
    }

    if !history.is_empty() {
        prompt.push_str("\nConversation so far:\n");
        for entry in history {
            let _ = writeln!(prompt, "{}: {}", entry.role.label(), entry.content);
        }
    }

    let _ = write!(prompt, "\n\nUser: {}", message);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_without_context() {
        let prompt = build_prompt(&[], None, "What are the symptoms?");
        assert!(prompt.starts_with("You are a helpful medical AI assistant"));
        assert!(prompt.ends_with("\n\nUser: What are the symptoms?"));
        assert!(!prompt.contains("Current Patient Assessment"));
    }

    #[test]
    fn test_risk_context_rendering() {
        let risk: RiskContext = serde_json::from_value(json!({
            "risk_level": "HIGH",
            "probability": 0.8291,
            "age": 34,
            "gender": "Male",
            "ns1": "Positive",
            "area": "Mirpur",
            "district": "Dhaka"
        }))
        .unwrap();

        let block = risk_context(&risk);
        assert!(block.contains("- Risk Level: HIGH"));
        assert!(block.contains("- Risk Probability: 82%"));
        assert!(block.contains("- Age: 34 years"));
        assert!(block.contains("NS1 Positive, IgG Unknown, IgM Unknown"));
        assert!(block.contains("- Location: Mirpur, Dhaka"));
    }

    #[test]
    fn test_empty_risk_context_uses_unknown() {
        let block = risk_context(&RiskContext::default());
        assert!(block.contains("- Risk Level: Unknown"));
        assert!(block.contains("- Risk Probability: Unknown"));
    }

    #[test]
    fn test_empty_assessment_is_skipped() {
        let risk: RiskContext = serde_json::from_value(json!({})).unwrap();
        let prompt = build_prompt(&[], Some(&risk), "hello");
        assert!(!prompt.contains("Current Patient Assessment"));

        let risk = RiskContext {
            area: Some("Badda".to_string()),
            ..RiskContext::default()
        };
        let prompt = build_prompt(&[], Some(&risk), "hello");
        assert!(prompt.contains("- Location: Badda, Unknown"));
    }

    #[test]
    fn test_history_replayed_in_order() {
        let history = vec![
            ChatMessage::user("Is fever a symptom?"),
            ChatMessage::assistant("Yes."),
        ];
        let prompt = build_prompt(&history, None, "What else?");
        let user = prompt.find("User: Is fever a symptom?").unwrap();
        let assistant = prompt.find("Assistant: Yes.").unwrap();
        let latest = prompt.rfind("User: What else?").unwrap();
        assert!(user < assistant && assistant < latest);
    }
}
