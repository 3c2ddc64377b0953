use crate::commands::{CmdMessage, CmdResult};
use crate::error::{ArcanaError, Result};
use crate::interpret::{InterpretationRequest, Interpreter};
use crate::model::Language;
use crate::store::{HistoryBackend, HistoryStore};

/// Asks `interpreter` for a reading. A failed interpretation is reported as
/// an error message, not an error: the reading itself is unaffected.
pub async fn run(interpreter: &dyn Interpreter, request: &InterpretationRequest) -> Result<CmdResult> {
    if request.cards.is_empty() {
        return Err(ArcanaError::EmptyReading);
    }

    let mut result = CmdResult::default();
    match interpreter.interpret(request).await {
        Ok(text) => {
            tracing::info!(backend = interpreter.name(), chars = text.len(), "interpretation received");
            result = result.with_interpretation(text);
        }
        Err(ArcanaError::InterpretationFailed { reason }) => {
            result.add_message(CmdMessage::error(format!(
                "Interpretation failed ({}): {}",
                interpreter.name(),
                reason
            )));
        }
        Err(e) => return Err(e),
    }
    Ok(result)
}

/// Builds the request for the history entry at a 1-based `index`.
pub fn request_for<B: HistoryBackend>(
    store: &HistoryStore<B>,
    index: usize,
    question: Option<String>,
    language: Language,
) -> Result<InterpretationRequest> {
    let record = store.get(index).ok_or(ArcanaError::ReadingNotFound(index))?;
    let request = InterpretationRequest::from_record(record, language);
    Ok(match question {
        Some(q) if !q.trim().is_empty() => request.with_question(Some(q)),
        _ => request,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpret::NoInterpreter;
    use crate::model::{ReadingCard, ReadingRecord};
    use crate::store::memory::InMemoryStore;
    use async_trait::async_trait;

    struct Fixed;

    #[async_trait]
    impl Interpreter for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn interpret(&self, request: &InterpretationRequest) -> Result<String> {
            Ok(format!(
                "{} card(s), question: {}",
                request.cards.len(),
                request.question.as_deref().unwrap_or("-")
            ))
        }
    }

    fn store() -> HistoryStore<InMemoryStore> {
        let record = ReadingRecord::new("Three Card", vec![ReadingCard::new("Past", "The Hermit")])
            .with_question(Some("Work?".into()));
        HistoryStore::open(InMemoryStore::with_records(vec![record]))
    }

    #[tokio::test]
    async fn returns_interpretation_text() {
        let request = request_for(&store(), 1, None, Language::En).unwrap();
        let result = run(&Fixed, &request).await.unwrap();
        assert_eq!(result.interpretation.as_deref(), Some("1 card(s), question: Work?"));
    }

    #[tokio::test]
    async fn question_override_wins() {
        let request = request_for(&store(), 1, Some("Love?".into()), Language::En).unwrap();
        let result = run(&Fixed, &request).await.unwrap();
        assert_eq!(result.interpretation.as_deref(), Some("1 card(s), question: Love?"));
    }

    #[tokio::test]
    async fn failure_becomes_message_and_history_is_untouched() {
        let store = store();
        let request = request_for(&store, 1, None, Language::En).unwrap();
        let result = run(&NoInterpreter, &request).await.unwrap();
        assert!(result.interpretation.is_none());
        assert!(result.messages[0].content.contains("Interpretation failed"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_index_is_not_found() {
        assert!(matches!(
            request_for(&store(), 4, None, Language::En),
            Err(ArcanaError::ReadingNotFound(4))
        ));
    }

    #[tokio::test]
    async fn empty_request_is_rejected() {
        let request = InterpretationRequest::new("One Card", vec![]);
        assert!(matches!(
            run(&Fixed, &request).await,
            Err(ArcanaError::EmptyReading)
        ));
    }
}
