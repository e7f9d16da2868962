use crate::config::Config;
use crate::qa::QAService;
use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub qa_service: Arc<QAService>,
}

impl AppState {
    pub fn new(qa_service: Arc<QAService>) -> Self {
        Self { qa_service }
    }

    pub fn config(&self) -> &Config {
        &self.qa_service.config
    }
}
