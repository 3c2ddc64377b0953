//! # Interpretations
//!
//! An interpretation turns a spread name, the drawn (position, card) pairs
//! and an optional question into free text by asking a language model. The
//! model is an external collaborator: the rest of arcana only sees the
//! [`Interpreter`] trait and treats the answer as an opaque string.
//!
//! ## Backends
//!
//! - [`ollama::OllamaInterpreter`]: runs a local model via `ollama run`.
//! - [`openrouter::OpenRouterInterpreter`]: calls a hosted chat-completions API.
//! - [`NoInterpreter`]: configured when interpretations are turned off.
//!
//! Every backend is wrapped in [`Bounded`], which caps the call at the
//! configured timeout and reports `timeout` as the failure reason. Failures
//! are always [`ArcanaError::InterpretationFailed`]; a failed interpretation
//! never affects the reading it was asked about.
//!
//! Interpreters hold no session or history state, so callers can run them on
//! a background task while the session keeps going.

use crate::config::{ArcanaConfig, Backend};
use crate::error::{ArcanaError, Result};
use crate::model::{Language, ReadingCard, ReadingRecord};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;

pub mod ollama;
pub mod openrouter;
pub mod prompt;

pub const TIMEOUT_REASON: &str = "timeout";

static THINK_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid think-block pattern"));

/// Everything an interpreter needs to know about a reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpretationRequest {
    pub spread_name: String,
    pub cards: Vec<ReadingCard>,
    pub question: Option<String>,
    pub language: Language,
}

impl InterpretationRequest {
    pub fn new(spread_name: impl Into<String>, cards: Vec<ReadingCard>) -> Self {
        Self {
            spread_name: spread_name.into(),
            cards,
            question: None,
            language: Language::default(),
        }
    }

    pub fn with_question(mut self, question: Option<String>) -> Self {
        self.question = question.filter(|q| !q.trim().is_empty());
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn from_record(record: &ReadingRecord, language: Language) -> Self {
        Self::new(record.spread.clone(), record.cards.clone())
            .with_question(record.question.clone())
            .with_language(language)
    }
}

#[async_trait]
pub trait Interpreter: Send + Sync {
    /// Short backend name for messages and logs.
    fn name(&self) -> &str;

    async fn interpret(&self, request: &InterpretationRequest) -> Result<String>;

    /// Checks that the backend is reachable. Returns a status line.
    async fn health_check(&self) -> Result<String> {
        Ok(format!("{} is ready", self.name()))
    }
}

/// Caps an interpreter at a fixed timeout.
pub struct Bounded<I> {
    inner: I,
    timeout: Duration,
}

impl<I: Interpreter> Bounded<I> {
    pub fn new(inner: I, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl<I: Interpreter> Interpreter for Bounded<I> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn interpret(&self, request: &InterpretationRequest) -> Result<String> {
        if request.cards.is_empty() {
            return Err(ArcanaError::interpretation("no cards to interpret"));
        }
        tracing::debug!(backend = self.name(), cards = request.cards.len(), "requesting interpretation");
        match tokio::time::timeout(self.timeout, self.inner.interpret(request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(backend = self.name(), timeout = ?self.timeout, "interpretation timed out");
                Err(ArcanaError::interpretation(TIMEOUT_REASON))
            }
        }
    }

    async fn health_check(&self) -> Result<String> {
        match tokio::time::timeout(self.timeout, self.inner.health_check()).await {
            Ok(result) => result,
            Err(_) => Err(ArcanaError::interpretation(TIMEOUT_REASON)),
        }
    }
}

/// Stand-in used when interpretations are disabled.
pub struct NoInterpreter;

#[async_trait]
impl Interpreter for NoInterpreter {
    fn name(&self) -> &str {
        "none"
    }

    async fn interpret(&self, _request: &InterpretationRequest) -> Result<String> {
        Err(ArcanaError::interpretation(
            "interpretations are disabled (set `backend` to ollama or openrouter)",
        ))
    }

    async fn health_check(&self) -> Result<String> {
        Err(ArcanaError::interpretation("no backend configured"))
    }
}

/// Builds the configured backend, wrapped in its timeout.
pub fn from_config(config: &ArcanaConfig) -> Result<Arc<dyn Interpreter>> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let interpreter: Arc<dyn Interpreter> = match config.backend {
        Backend::Ollama => Arc::new(Bounded::new(
            ollama::OllamaInterpreter::new(config.ollama_command.clone(), config.model_name()),
            timeout,
        )),
        Backend::OpenRouter => Arc::new(Bounded::new(
            openrouter::OpenRouterInterpreter::from_env(
                config.openrouter_url.clone(),
                config.model_name(),
            )?,
            timeout,
        )),
        Backend::None => Arc::new(NoInterpreter),
    };
    Ok(interpreter)
}

/// Removes `<think>…</think>` reasoning blocks some models emit, then trims.
pub fn clean_response(text: &str) -> String {
    THINK_BLOCK.replace_all(text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stalled;

    #[async_trait]
    impl Interpreter for Stalled {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn interpret(&self, _request: &InterpretationRequest) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("too late".to_string())
        }
    }

    struct Echo;

    #[async_trait]
    impl Interpreter for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn interpret(&self, request: &InterpretationRequest) -> Result<String> {
            Ok(format!("{}: {}", request.spread_name, request.cards[0].card))
        }
    }

    fn one_card() -> InterpretationRequest {
        InterpretationRequest::new("One Card", vec![ReadingCard::new("Core Message", "The Star")])
    }

    #[tokio::test]
    async fn timeout_becomes_interpretation_failed() {
        let bounded = Bounded::new(Stalled, Duration::from_millis(20));
        let err = bounded.interpret(&one_card()).await.unwrap_err();
        assert!(matches!(
            err,
            ArcanaError::InterpretationFailed { ref reason } if reason == TIMEOUT_REASON
        ));
    }

    #[tokio::test]
    async fn fast_interpreter_passes_through() {
        let bounded = Bounded::new(Echo, Duration::from_secs(5));
        let text = bounded.interpret(&one_card()).await.unwrap();
        assert_eq!(text, "One Card: The Star");
    }

    #[tokio::test]
    async fn empty_reading_is_rejected() {
        let bounded = Bounded::new(Echo, Duration::from_secs(5));
        let request = InterpretationRequest::new("One Card", vec![]);
        assert!(matches!(
            bounded.interpret(&request).await,
            Err(ArcanaError::InterpretationFailed { .. })
        ));
    }

    #[tokio::test]
    async fn disabled_backend_fails_softly() {
        let err = NoInterpreter.interpret(&one_card()).await.unwrap_err();
        assert!(err.to_string().contains("disabled"));
    }

    #[test]
    fn strips_think_blocks() {
        let raw = "<think>\nplanning the answer\n</think>\n\n## The Star\nHope returns.";
        assert_eq!(clean_response(raw), "## The Star\nHope returns.");
    }

    #[test]
    fn request_from_record_keeps_question() {
        let record = ReadingRecord::new("Three Card", vec![ReadingCard::new("Past", "Death")])
            .with_question(Some("Should I move?".into()));
        let request = InterpretationRequest::from_record(&record, Language::Ko);
        assert_eq!(request.question.as_deref(), Some("Should I move?"));
        assert_eq!(request.language, Language::Ko);
        assert_eq!(request.cards, record.cards);
    }

    #[test]
    fn none_backend_builds_without_io() {
        let config = ArcanaConfig {
            backend: Backend::None,
            ..Default::default()
        };
        let interpreter = from_config(&config).unwrap();
        assert_eq!(interpreter.name(), "none");
    }
}
