//! # Draw Sessions
//!
//! A [`DrawSession`] is one reading in progress: a spread, the cards still in
//! the deck, and the cards placed so far. Drawing removes the chosen id from
//! `remaining`, so a card can never appear twice in one session.
//!
//! ```text
//! Ready ──draw──▶ Drawing ──draw (last position)──▶ Exhausted
//!   ▲                │                                   │
//!   └──────reset─────┴───────────────reset───────────────┘
//! ```
//!
//! Callers may stop early: saving or interpreting only needs one drawn card.
//! The random source is seeded from OS entropy per session; tests pass a
//! seeded [`StdRng`] through [`DrawSession::with_rng`].

use crate::deck::Deck;
use crate::error::{ArcanaError, Result};
use crate::model::{CardId, DrawnCard, Language, ReadingCard, ReadingRecord};
use crate::spread::Spread;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Ready,
    Drawing,
    Exhausted,
}

pub struct DrawSession<'d> {
    deck: &'d Deck,
    spread: Spread,
    remaining: Vec<CardId>,
    drawn: Vec<DrawnCard>,
    rng: StdRng,
}

impl<'d> DrawSession<'d> {
    pub fn start(deck: &'d Deck, spread: Spread) -> Self {
        Self::with_rng(deck, spread, StdRng::from_os_rng())
    }

    pub fn with_rng(deck: &'d Deck, spread: Spread, rng: StdRng) -> Self {
        let drawn = Vec::with_capacity(spread.count());
        Self {
            deck,
            remaining: deck.ids(),
            drawn,
            spread,
            rng,
        }
    }

    /// Draws the card for the next open position.
    pub fn draw_next(&mut self) -> Result<&DrawnCard> {
        let position = self.drawn.len();
        let label = match self.spread.label(position) {
            Some(label) => label.to_string(),
            None => {
                return Err(ArcanaError::SessionExhausted {
                    count: self.spread.count(),
                })
            }
        };

        // Spreads never exceed the deck size, so this only guards hand-built spreads.
        if self.remaining.is_empty() {
            return Err(ArcanaError::SessionExhausted {
                count: self.drawn.len(),
            });
        }

        let pick = self.rng.random_range(0..self.remaining.len());
        let id = self.remaining.swap_remove(pick);
        let card = self
            .deck
            .get(id)
            .cloned()
            .ok_or_else(|| ArcanaError::MalformedDeck(format!("card id {} missing", id)))?;

        tracing::debug!(position = %label, card = %card.name, remaining = self.remaining.len(), "card drawn");
        self.drawn.push(DrawnCard {
            position: label,
            card,
        });
        Ok(&self.drawn[position])
    }

    /// Fills every open position. Returns how many cards were drawn.
    pub fn draw_remaining(&mut self) -> Result<usize> {
        let mut count = 0;
        while !self.is_exhausted() {
            self.draw_next()?;
            count += 1;
        }
        Ok(count)
    }

    /// Puts every card back and starts over with the same spread.
    pub fn reset(&mut self) {
        self.remaining = self.deck.ids();
        self.drawn.clear();
        tracing::debug!(spread = %self.spread.key, "session reset");
    }

    pub fn state(&self) -> SessionState {
        if self.is_exhausted() {
            SessionState::Exhausted
        } else if self.drawn.is_empty() {
            SessionState::Ready
        } else {
            SessionState::Drawing
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.drawn.len() >= self.spread.count()
    }

    pub fn spread(&self) -> &Spread {
        &self.spread
    }

    pub fn drawn(&self) -> &[DrawnCard] {
        &self.drawn
    }

    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    pub fn positions_left(&self) -> usize {
        self.spread.count().saturating_sub(self.drawn.len())
    }

    /// The drawn (position, card name) pairs in draw order.
    pub fn reading_cards(&self, language: Language) -> Vec<ReadingCard> {
        self.drawn
            .iter()
            .map(|d| ReadingCard::new(d.position.clone(), d.card.name_in(language)))
            .collect()
    }

    pub fn to_record(
        &self,
        note: impl Into<String>,
        question: Option<String>,
        language: Language,
    ) -> Result<ReadingRecord> {
        if self.drawn.is_empty() {
            return Err(ArcanaError::EmptyReading);
        }
        Ok(
            ReadingRecord::new(self.spread.name.clone(), self.reading_cards(language))
                .with_note(note)
                .with_question(question),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spread::{resolve, CUSTOM_KEY};
    use std::collections::HashSet;

    fn seeded(spread: Spread, seed: u64) -> DrawSession<'static> {
        DrawSession::with_rng(Deck::standard(), spread, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn three_card_draws_in_label_order() {
        let mut session = seeded(resolve("three_card", None).unwrap(), 7);
        assert_eq!(session.state(), SessionState::Ready);

        let mut ids = HashSet::new();
        for expected in ["Past", "Present", "Future"] {
            let drawn = session.draw_next().unwrap();
            assert_eq!(drawn.position, expected);
            ids.insert(drawn.card.id);
        }
        assert_eq!(ids.len(), 3);
        assert_eq!(session.state(), SessionState::Exhausted);
        assert_eq!(session.remaining(), 75);
    }

    #[test]
    fn every_count_draws_distinct_cards_then_exhausts() {
        let deck_size = Deck::standard().len();
        for n in 1..=deck_size {
            let mut session = seeded(resolve(CUSTOM_KEY, Some(n)).unwrap(), n as u64);
            let mut ids = HashSet::new();
            for _ in 0..n {
                ids.insert(session.draw_next().unwrap().card.id);
            }
            assert_eq!(ids.len(), n);
            assert!(matches!(
                session.draw_next(),
                Err(ArcanaError::SessionExhausted { count }) if count == n
            ));
        }
    }

    #[test]
    fn full_deck_session_covers_whole_deck() {
        let deck = Deck::standard();
        let mut session = seeded(resolve(CUSTOM_KEY, Some(deck.len())).unwrap(), 1);
        assert_eq!(session.draw_remaining().unwrap(), deck.len());
        let ids: HashSet<_> = session.drawn().iter().map(|d| d.card.id).collect();
        let all: HashSet<_> = deck.ids().into_iter().collect();
        assert_eq!(ids, all);
        assert_eq!(session.remaining(), 0);
    }

    #[test]
    fn drawing_state_after_first_card() {
        let mut session = seeded(resolve("relationship", None).unwrap(), 3);
        session.draw_next().unwrap();
        assert_eq!(session.state(), SessionState::Drawing);
        assert_eq!(session.positions_left(), 4);
    }

    #[test]
    fn reset_restores_full_deck() {
        let mut session = seeded(resolve("three_card", None).unwrap(), 11);
        session.draw_remaining().unwrap();
        session.reset();
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.remaining(), 78);
        assert!(session.drawn().is_empty());
        assert_eq!(session.draw_next().unwrap().position, "Past");
    }

    #[test]
    fn different_seeds_give_different_sequences() {
        let spread = resolve(CUSTOM_KEY, Some(10)).unwrap();
        let mut a = seeded(spread.clone(), 1);
        let mut b = seeded(spread, 2);
        a.draw_remaining().unwrap();
        b.draw_remaining().unwrap();
        let ids_a: Vec<_> = a.drawn().iter().map(|d| d.card.id).collect();
        let ids_b: Vec<_> = b.drawn().iter().map(|d| d.card.id).collect();
        assert_ne!(ids_a, ids_b);
    }

    #[test]
    fn partial_session_builds_record() {
        let mut session = seeded(resolve("celtic_cross", None).unwrap(), 5);
        session.draw_next().unwrap();
        session.draw_next().unwrap();
        let record = session
            .to_record("half done", Some("What next?".into()), Language::En)
            .unwrap();
        assert_eq!(record.spread, "Seven Card");
        assert_eq!(record.cards.len(), 2);
        assert_eq!(record.cards[0].position, "Current Situation");
        assert_eq!(record.cards[1].position, "Past Influence");
        assert_eq!(record.note, "half done");
        assert_eq!(record.question.as_deref(), Some("What next?"));
    }

    #[test]
    fn empty_session_cannot_be_recorded() {
        let session = seeded(resolve("one_card", None).unwrap(), 9);
        assert!(matches!(
            session.to_record("", None, Language::En),
            Err(ArcanaError::EmptyReading)
        ));
    }

    #[test]
    fn reading_cards_use_requested_language() {
        let mut session = seeded(resolve("one_card", None).unwrap(), 4);
        let card = session.draw_next().unwrap().card.clone();
        let cards = session.reading_cards(Language::Ko);
        assert_eq!(cards[0].card, card.name_ko);
    }
}
