use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language used for card names, spread labels and requested interpretations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ko,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ko => "ko",
        }
    }

    /// English name of the language, used when asking a model to answer in it.
    pub fn english_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ko => "Korean",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "ko" | "korean" => Ok(Language::Ko),
            other => Err(format!("Unknown language: {} (expected en or ko)", other)),
        }
    }
}

/// Stable identifier of a card within the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u8);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Wands,
    Cups,
    Swords,
    Pentacles,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Wands, Suit::Cups, Suit::Swords, Suit::Pentacles];

    pub fn name(&self) -> &'static str {
        match self {
            Suit::Wands => "Wands",
            Suit::Cups => "Cups",
            Suit::Swords => "Swords",
            Suit::Pentacles => "Pentacles",
        }
    }

    pub fn name_ko(&self) -> &'static str {
        match self {
            Suit::Wands => "완드",
            Suit::Cups => "컵",
            Suit::Swords => "소드",
            Suit::Pentacles => "펜타클",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arcana {
    Major,
    Minor(Suit),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub name_ko: String,
    pub arcana: Arcana,
}

impl Card {
    pub fn name_in(&self, language: Language) -> &str {
        match language {
            Language::En => &self.name,
            Language::Ko => &self.name_ko,
        }
    }
}

/// A card placed at a spread position during a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawnCard {
    pub position: String,
    pub card: Card,
}

/// One (position, card) entry as persisted in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingCard {
    pub position: String,
    pub card: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ReadingCard {
    pub fn new(position: impl Into<String>, card: impl Into<String>) -> Self {
        Self {
            position: position.into(),
            card: card.into(),
            path: None,
        }
    }
}

/// A saved reading. Records are immutable once created; the history file
/// holds a JSON array of them, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingRecord {
    pub date: String,
    pub spread: String,
    pub cards: Vec<ReadingCard>,
    #[serde(default)]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

impl ReadingRecord {
    pub fn new(spread: impl Into<String>, cards: Vec<ReadingCard>) -> Self {
        Self {
            date: now_timestamp(),
            spread: spread.into(),
            cards,
            note: String::new(),
            question: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_question(mut self, question: Option<String>) -> Self {
        self.question = question.filter(|q| !q.trim().is_empty());
        self
    }

    /// Parses `date`, accepting RFC 3339 as well as the older
    /// `YYYY-MM-DD HH:MM:SS` local-time format.
    pub fn parsed_date(&self) -> Option<DateTime<Local>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.date) {
            return Some(dt.with_timezone(&Local));
        }
        NaiveDateTime::parse_from_str(&self.date, "%Y-%m-%d %H:%M:%S")
            .ok()
            .and_then(|naive| naive.and_local_timezone(Local).single())
    }
}

pub fn now_timestamp() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}
