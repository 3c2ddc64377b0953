use crate::commands::{CmdMessage, CmdResult, IndexedReading};
use crate::error::Result;
use crate::model::Language;
use crate::session::DrawSession;
use crate::store::{HistoryBackend, HistoryStore};

/// Saves the session's current (possibly partial) reading as the newest
/// history entry.
pub fn run<B: HistoryBackend>(
    store: &mut HistoryStore<B>,
    session: &DrawSession<'_>,
    note: &str,
    question: Option<String>,
    language: Language,
) -> Result<CmdResult> {
    let record = session.to_record(note.trim(), question, language)?;
    store.save(record.clone())?;

    let mut result = CmdResult::default().with_readings(vec![IndexedReading { index: 1, record }]);
    result.add_message(CmdMessage::success(format!(
        "Reading saved ({} card(s), {} in history).",
        session.drawn().len(),
        store.len()
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;
    use crate::error::ArcanaError;
    use crate::spread::resolve_in;
    use crate::store::memory::InMemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session(language: Language) -> DrawSession<'static> {
        DrawSession::with_rng(
            Deck::standard(),
            resolve_in(language, "three_card", None).unwrap(),
            StdRng::seed_from_u64(3),
        )
    }

    #[test]
    fn saves_partial_reading_first() {
        let backend = InMemoryStore::new();
        let mut store = HistoryStore::open(backend.clone());
        let mut s = session(Language::En);
        s.draw_next().unwrap();
        s.draw_next().unwrap();

        let result = run(&mut store, &s, "  kitchen table ", None, Language::En).unwrap();
        let saved = &result.readings[0].record;
        assert_eq!(saved.spread, "Three Card");
        assert_eq!(saved.cards.len(), 2);
        assert_eq!(saved.cards[0].position, "Past");
        assert_eq!(saved.note, "kitchen table");
        assert_eq!(backend.load().unwrap().unwrap()[0], *saved);
    }

    #[test]
    fn empty_session_is_rejected() {
        let mut store = HistoryStore::open(InMemoryStore::new());
        let s = session(Language::En);
        assert!(matches!(
            run(&mut store, &s, "", None, Language::En),
            Err(ArcanaError::EmptyReading)
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn korean_reading_uses_korean_names() {
        let mut store = HistoryStore::open(InMemoryStore::new());
        let mut s = session(Language::Ko);
        s.draw_next().unwrap();
        let result = run(&mut store, &s, "", Some("이사".into()), Language::Ko).unwrap();
        let saved = &result.readings[0].record;
        assert_eq!(saved.spread, "3장 리딩");
        assert_eq!(saved.cards[0].position, "과거");
        assert_eq!(saved.cards[0].card, s.drawn()[0].card.name_ko);
        assert_eq!(saved.question.as_deref(), Some("이사"));
    }

    #[test]
    fn write_failure_propagates() {
        let backend = InMemoryStore::new();
        backend.set_simulate_write_error(true);
        let mut store = HistoryStore::open(backend);
        let mut s = session(Language::En);
        s.draw_next().unwrap();
        assert!(run(&mut store, &s, "", None, Language::En).is_err());
        assert!(store.is_empty());
    }
}
