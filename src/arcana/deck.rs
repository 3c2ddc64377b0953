//! # The Deck
//!
//! The standard deck is the 78-card tarot: 22 Major Arcana followed by the
//! four Minor suits (Wands, Cups, Swords, Pentacles), each running Ace, 2-10,
//! Page, Knight, Queen, King. Card ids follow that order, so `CardId(0)` is
//! The Fool and `CardId(77)` is the King of Pentacles. Ids are persisted
//! nowhere but are stable across runs, which keeps equality and tests simple.
//!
//! The deck is built once per process and never mutated. A malformed catalog
//! (duplicate ids, no cards) is a programming error, so the standard deck
//! panics on construction rather than limping along.

use crate::error::{ArcanaError, Result};
use crate::model::{Arcana, Card, CardId, Language, Suit};
use once_cell::sync::Lazy;
use std::collections::HashSet;

const MAJOR_ARCANA: [(&str, &str); 22] = [
    ("The Fool", "바보"),
    ("The Magician", "마법사"),
    ("The High Priestess", "여사제"),
    ("The Empress", "여황제"),
    ("The Emperor", "황제"),
    ("The Hierophant", "교황"),
    ("The Lovers", "연인"),
    ("The Chariot", "전차"),
    ("Strength", "힘"),
    ("The Hermit", "은둔자"),
    ("Wheel of Fortune", "운명의 수레바퀴"),
    ("Justice", "정의"),
    ("The Hanged Man", "행맨"),
    ("Death", "죽음"),
    ("Temperance", "절제"),
    ("The Devil", "악마"),
    ("The Tower", "타워"),
    ("The Star", "별"),
    ("The Moon", "달"),
    ("The Sun", "태양"),
    ("Judgement", "심판"),
    ("The World", "세계"),
];

const COURT: [(&str, &str); 4] = [
    ("Page", "페이지"),
    ("Knight", "나이트"),
    ("Queen", "퀸"),
    ("King", "킹"),
];

static STANDARD: Lazy<Deck> = Lazy::new(|| {
    Deck::from_cards(standard_cards()).expect("standard tarot catalog is well-formed")
});

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The 78-card standard deck, shared for the lifetime of the process.
    pub fn standard() -> &'static Deck {
        &STANDARD
    }

    pub fn from_cards(cards: Vec<Card>) -> Result<Self> {
        if cards.is_empty() {
            return Err(ArcanaError::MalformedDeck("deck has no cards".to_string()));
        }
        let mut seen = HashSet::with_capacity(cards.len());
        for card in &cards {
            if !seen.insert(card.id) {
                return Err(ArcanaError::MalformedDeck(format!(
                    "duplicate card id {} ({})",
                    card.id, card.name
                )));
            }
        }
        Ok(Self { cards })
    }

    pub fn all_cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn ids(&self) -> Vec<CardId> {
        self.cards.iter().map(|c| c.id).collect()
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        // Standard ids are positional, but custom decks need not be.
        match self.cards.get(id.0 as usize) {
            Some(card) if card.id == id => Some(card),
            _ => self.cards.iter().find(|c| c.id == id),
        }
    }

    /// Cards whose English or Korean name contains `query`, case-insensitively.
    pub fn find(&self, query: &str) -> Vec<&Card> {
        let needle = query.trim().to_lowercase();
        self.cards
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&needle) || c.name_ko.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn names(&self, language: Language) -> Vec<&str> {
        self.cards.iter().map(|c| c.name_in(language)).collect()
    }
}

fn standard_cards() -> Vec<Card> {
    let mut cards = Vec::with_capacity(78);

    for (name, name_ko) in MAJOR_ARCANA {
        let id = CardId(cards.len() as u8);
        cards.push(Card {
            id,
            name: name.to_string(),
            name_ko: name_ko.to_string(),
            arcana: Arcana::Major,
        });
    }

    for suit in Suit::ALL {
        let mut push = |name: String, name_ko: String| {
            let id = CardId(cards.len() as u8);
            cards.push(Card {
                id,
                name,
                name_ko,
                arcana: Arcana::Minor(suit),
            });
        };

        push(
            format!("Ace of {}", suit.name()),
            format!("{} 에이스", suit.name_ko()),
        );
        for n in 2..=10 {
            push(
                format!("{} of {}", n, suit.name()),
                format!("{} {}", suit.name_ko(), n),
            );
        }
        for (rank, rank_ko) in COURT {
            push(
                format!("{} of {}", rank, suit.name()),
                format!("{} {}", suit.name_ko(), rank_ko),
            );
        }
    }

    cards
}
