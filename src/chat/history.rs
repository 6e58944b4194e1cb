//! Bounded conversation history with FIFO eviction

use crate::types::ChatMessage;
use std::collections::VecDeque;

/// Most recent conversation entries, oldest evicted first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationHistory {
    entries: VecDeque<ChatMessage>,
    max_entries: usize,
}

impl ConversationHistory {
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
        }
    }

    /// Adopt a client-supplied history, keeping only the newest entries
    pub fn from_messages(messages: Vec<ChatMessage>, max_entries: usize) -> Self {
        let mut history = Self::with_capacity(max_entries);
        for message in messages {
            history.add(message);
        }
        history
    }

    /// Append an entry, evicting the oldest when at capacity
    pub fn add(&mut self, message: ChatMessage) {
        if self.max_entries == 0 {
            return;
        }
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(message);
    }

    pub fn entries(&self) -> &VecDeque<ChatMessage> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<ChatMessage> {
        self.entries.into()
    }
}

/// Keep the newest `max_entries` messages
pub fn truncate_history(messages: Vec<ChatMessage>, max_entries: usize) -> Vec<ChatMessage> {
    ConversationHistory::from_messages(messages, max_entries).into_vec()
}
