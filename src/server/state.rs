//! Shared state injected into every handler

use crate::cases::CaseStore;
use crate::chat::ChatService;
use crate::errors::{PredictorError, Result};
use crate::prediction::PredictionService;
use std::sync::Arc;

pub struct AppState {
    pub prediction: PredictionService,
    pub chat: ChatService,
    pub cases: Option<Arc<dyn CaseStore>>,
}

impl AppState {
    pub fn new(
        prediction: PredictionService,
        chat: ChatService,
        cases: Option<Arc<dyn CaseStore>>,
    ) -> Self {
        Self {
            prediction,
            chat,
            cases,
        }
    }

    pub fn case_store(&self) -> Result<&Arc<dyn CaseStore>> {
        self.cases
            .as_ref()
            .ok_or(PredictorError::CaseStoreNotConfigured)
    }
}
