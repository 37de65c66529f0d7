use std::sync::Arc;

use crate::{model::ModelManager, quiz::QuestionSource};

#[derive(Debug, Clone)]
pub struct AppState {
    mm: ModelManager,
    source: Arc<dyn QuestionSource>,
    jwt: Arc<str>,
    docs: bool,
}

impl AppState {
    pub fn new(mm: ModelManager, source: Arc<dyn QuestionSource>, jwt: &str) -> Self {
        Self {
            mm,
            source,
            jwt: Arc::from(jwt),
            docs: false,
        }
    }

    pub fn with_docs(mut self, docs: bool) -> Self {
        self.docs = docs;
        self
    }

    pub fn mm(&self) -> &ModelManager {
        &self.mm
    }

    pub fn source(&self) -> &dyn QuestionSource {
        self.source.as_ref()
    }

    pub fn jwt(&self) -> &str {
        &self.jwt
    }

    pub fn docs(&self) -> bool {
        self.docs
    }
}
