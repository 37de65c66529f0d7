//! Generation source boundary.
//!
//! The source hands back raw question-shaped JSON. Nothing here retries: one
//! request, validated and truncated, is all a caller gets.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{
    config::Generator,
    model::entity::Difficulty,
    quiz::{Question, QuizError, QuizResult, question::filter_and_truncate},
};

pub const MAX_TOPIC_LEN: usize = 200;
pub const MAX_QUESTIONS: i32 = 50;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("question source request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("question source returned status {0}")]
    HttpStatus(reqwest::StatusCode),
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GenerationRequest {
    pub topic: String,
    pub number_questions: i32,
    pub difficulty: Difficulty,
}

impl GenerationRequest {
    pub fn check(&self) -> QuizResult<()> {
        check_topic(&self.topic)?;
        check_total(self.number_questions, "number_questions")
    }
}

pub(crate) fn check_topic(topic: &str) -> QuizResult<()> {
    if topic.trim().is_empty() {
        return Err(QuizError::validation("topic must not be blank"));
    }
    if topic.chars().count() > MAX_TOPIC_LEN {
        return Err(QuizError::validation(format!(
            "topic must be at most {MAX_TOPIC_LEN} characters"
        )));
    }
    Ok(())
}

pub(crate) fn check_total(total: i32, field: &str) -> QuizResult<()> {
    if !(1..=MAX_QUESTIONS).contains(&total) {
        return Err(QuizError::validation(format!(
            "{field} must be between 1 and {MAX_QUESTIONS}"
        )));
    }
    Ok(())
}

#[async_trait::async_trait]
pub trait QuestionSource: std::fmt::Debug + Send + Sync {
    /// Up to `number_questions` raw objects, untrusted.
    async fn fetch(&self, request: &GenerationRequest) -> Result<Vec<Value>, SourceError>;
}

#[derive(Debug, Deserialize)]
struct SourceResponse {
    #[serde(default)]
    questions: Vec<Value>,
}

/// Talks to an HTTP generator that answers `{"questions": [...]}`.
#[derive(Debug, Clone)]
pub struct HttpQuestionSource {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpQuestionSource {
    pub fn new(config: &Generator) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs()))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint().to_string(),
            api_key: config.api_key().map(str::to_string),
        })
    }
}

#[async_trait::async_trait]
impl QuestionSource for HttpQuestionSource {
    #[tracing::instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch(&self, request: &GenerationRequest) -> Result<Vec<Value>, SourceError> {
        let mut req = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(SourceError::HttpStatus(resp.status()));
        }

        let body: SourceResponse = resp.json().await?;
        tracing::debug!("question source returned {} items", body.questions.len());
        Ok(body.questions)
    }
}

/// Asks the source once and keeps what passes the structural contract.
#[tracing::instrument(skip(source))]
pub async fn generate(
    source: &dyn QuestionSource,
    request: &GenerationRequest,
) -> QuizResult<Vec<Question>> {
    request.check()?;

    let raw = source.fetch(request).await?;
    let questions = filter_and_truncate(&raw, request.number_questions as usize)?;

    tracing::info!(
        "generated {}/{} questions on `{}`",
        questions.len(),
        request.number_questions,
        request.topic
    );
    Ok(questions)
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[derive(Debug)]
    struct Canned(Vec<Value>);

    #[async_trait::async_trait]
    impl QuestionSource for Canned {
        async fn fetch(&self, _request: &GenerationRequest) -> Result<Vec<Value>, SourceError> {
            Ok(self.0.clone())
        }
    }

    fn request(topic: &str, n: i32) -> GenerationRequest {
        GenerationRequest {
            topic: topic.into(),
            number_questions: n,
            difficulty: Difficulty::Easy,
        }
    }

    fn item(text: &str) -> Value {
        json!({
            "question": text,
            "options": ["yes", "no"],
            "answers": ["yes"],
            "explanation": "because",
        })
    }

    #[tokio::test]
    async fn generate_truncates_to_requested_count() {
        let source = Canned(vec![item("a"), item("b"), item("c")]);
        let out = generate(&source, &request("Rust", 2)).await.unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].question, "a");
    }

    #[tokio::test]
    async fn generate_rejects_bad_requests_before_fetching() {
        let source = Canned(vec![item("a")]);
        assert!(matches!(
            generate(&source, &request("  ", 2)).await,
            Err(QuizError::Validation(_))
        ));
        assert!(matches!(
            generate(&source, &request("Rust", 0)).await,
            Err(QuizError::Validation(_))
        ));
        assert!(matches!(
            generate(&source, &request("Rust", 51)).await,
            Err(QuizError::Validation(_))
        ));
        assert!(matches!(
            generate(&source, &request(&"x".repeat(201), 1)).await,
            Err(QuizError::Validation(_))
        ));
    }

    #[test]
    fn http_source_takes_its_settings_from_config() {
        let source = HttpQuestionSource::new(&Generator::new("http://127.0.0.1:9/generate")).unwrap();
        assert_eq!(source.endpoint, "http://127.0.0.1:9/generate");
        assert!(source.api_key.is_none());
    }

    #[tokio::test]
    async fn generate_fails_on_unusable_output() {
        let source = Canned(vec![json!({"question": "half"})]);
        assert!(matches!(
            generate(&source, &request("Rust", 3)).await,
            Err(QuizError::GenerationFailure)
        ));
    }
}
