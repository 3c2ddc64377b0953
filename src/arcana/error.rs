use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArcanaError {
    #[error("Unknown spread: {0}")]
    UnknownSpreadKey(String),

    #[error("Invalid card count {requested}: must be between 1 and {max}")]
    InvalidSpreadCount { requested: usize, max: usize },

    #[error("All {count} positions have been drawn")]
    SessionExhausted { count: usize },

    #[error("No cards have been drawn yet")]
    EmptyReading,

    #[error("Malformed deck: {0}")]
    MalformedDeck(String),

    #[error("Reading not found: {0}")]
    ReadingNotFound(usize),

    #[error("Interpretation failed: {reason}")]
    InterpretationFailed { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl ArcanaError {
    pub fn interpretation(reason: impl Into<String>) -> Self {
        ArcanaError::InterpretationFailed {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ArcanaError>;
