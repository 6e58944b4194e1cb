//! Chat orchestration over a [`TextGenerator`]

use super::history::{truncate_history, ConversationHistory};
use super::prompt::build_prompt;
use crate::llm::TextGenerator;
use crate::types::{ChatMessage, ChatRequest, ChatResponse};
use std::sync::Arc;
use tracing::{debug, error};

pub const NOT_CONFIGURED_MESSAGE: &str =
    "AI chat is not configured. Please set GOOGLE_API_KEY or configure an [ai] provider.";

/// Why a chat turn produced no assistant reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatFailure {
    /// No generator available
    NotConfigured,
    /// Request carried an empty message
    EmptyMessage,
    /// Upstream generation failed; carries the apology and the history to echo
    Generation(ChatResponse),
}

#[derive(Clone)]
pub struct ChatService {
    generator: Option<Arc<dyn TextGenerator>>,
    max_history: usize,
}

impl ChatService {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, max_history: usize) -> Self {
        Self {
            generator,
            max_history,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// One conversation turn
    pub async fn respond(&self, request: ChatRequest) -> Result<ChatResponse, ChatFailure> {
        let generator = self.generator.as_ref().ok_or(ChatFailure::NotConfigured)?;

        if request.message.trim().is_empty() {
            return Err(ChatFailure::EmptyMessage);
        }

        let prior = truncate_history(request.conversation_history, self.max_history);
        let prompt = build_prompt(&prior, request.risk_assessment.as_ref(), &request.message);
        debug!(history = prior.len(), prompt_chars = prompt.len(), "Generating chat reply");

        match generator.generate(&prompt).await {
            Ok(reply) => {
                let mut history = ConversationHistory::from_messages(prior, self.max_history);
                history.add(ChatMessage::user(request.message));
                history.add(ChatMessage::assistant(reply.clone()));

                Ok(ChatResponse {
                    response: reply,
                    conversation_history: history.into_vec(),
                })
            }
            Err(e) => {
                error!(error = %e, provider = generator.provider(), "Chat generation failed");
                Err(ChatFailure::Generation(ChatResponse {
                    response: format!("Sorry, I encountered an error: {}", e),
                    conversation_history: prior,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{PredictorError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recording {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for Recording {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .clone()
                .ok_or_else(|| PredictorError::GenerationError("quota exceeded".to_string()))
        }

        fn provider(&self) -> &str {
            "recording"
        }

        fn model(&self) -> &str {
            "test"
        }
    }

    fn service(reply: Option<&str>) -> (ChatService, Arc<Recording>) {
        let generator = Arc::new(Recording {
            reply: reply.map(str::to_string),
            prompts: Mutex::new(Vec::new()),
        });
        (ChatService::new(Some(generator.clone()), 10), generator)
    }

    fn request(message: &str, history: usize) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            conversation_history: (0..history)
                .map(|i| ChatMessage::user(format!("m{}", i)))
                .collect(),
            risk_assessment: None,
        }
    }

    #[tokio::test]
    async fn test_reply_appends_turn() {
        let (service, generator) = service(Some("Use repellent."));
        let response = service.respond(request("How to prevent?", 0)).await.unwrap();

        assert_eq!(response.response, "Use repellent.");
        assert_eq!(
            response.conversation_history,
            vec![
                ChatMessage::user("How to prevent?"),
                ChatMessage::assistant("Use repellent.")
            ]
        );
        assert!(generator.prompts.lock().unwrap()[0].ends_with("User: How to prevent?"));
    }

    #[tokio::test]
    async fn test_long_history_capped_with_newest_kept() {
        let (service, _) = service(Some("ok"));
        let response = service.respond(request("next", 12)).await.unwrap();

        let history = response.conversation_history;
        assert_eq!(history.len(), 10);
        assert_eq!(history[7].content, "m11");
        assert_eq!(history[8], ChatMessage::user("next"));
        assert_eq!(history[9], ChatMessage::assistant("ok"));
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let (service, generator) = service(Some("unused"));
        assert_eq!(
            service.respond(request("   ", 0)).await,
            Err(ChatFailure::EmptyMessage)
        );
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_not_configured() {
        let service = ChatService::new(None, 10);
        assert!(!service.is_configured());
        assert_eq!(
            service.respond(request("hi", 0)).await,
            Err(ChatFailure::NotConfigured)
        );
    }

    #[tokio::test]
    async fn test_generation_failure_becomes_apology() {
        let (service, _) = service(None);
        match service.respond(request("hi", 3)).await {
            Err(ChatFailure::Generation(response)) => {
                assert!(response.response.starts_with("Sorry, I encountered an error:"));
                assert!(response.response.contains("quota exceeded"));
                assert_eq!(response.conversation_history.len(), 3);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
