use crate::config::ArcanaConfig;
use crate::model::{Card, DrawnCard, ReadingRecord};
use crate::spread::{Spread, SpreadInfo};
use std::path::PathBuf;

pub mod config;
pub mod deck;
pub mod doctor;
pub mod draw;
pub mod history;
pub mod interpret;
pub mod save;
pub mod spreads;

#[derive(Debug, Clone)]
pub struct ArcanaPaths {
    pub data_dir: PathBuf,
}

impl ArcanaPaths {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }
}

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A history record paired with its 1-based display index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedReading {
    pub index: usize,
    pub record: ReadingRecord,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub spread: Option<Spread>,
    pub drawn_cards: Vec<DrawnCard>,
    pub readings: Vec<IndexedReading>,
    pub spreads: Vec<SpreadInfo>,
    pub cards: Vec<Card>,
    pub interpretation: Option<String>,
    pub config: Option<ArcanaConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_spread(mut self, spread: Spread) -> Self {
        self.spread = Some(spread);
        self
    }

    pub fn with_drawn_cards(mut self, cards: Vec<DrawnCard>) -> Self {
        self.drawn_cards = cards;
        self
    }

    pub fn with_readings(mut self, readings: Vec<IndexedReading>) -> Self {
        self.readings = readings;
        self
    }

    pub fn with_spreads(mut self, spreads: Vec<SpreadInfo>) -> Self {
        self.spreads = spreads;
        self
    }

    pub fn with_cards(mut self, cards: Vec<Card>) -> Self {
        self.cards = cards;
        self
    }

    pub fn with_interpretation(mut self, text: String) -> Self {
        self.interpretation = Some(text);
        self
    }

    pub fn with_config(mut self, config: ArcanaConfig) -> Self {
        self.config = Some(config);
        self
    }
}
