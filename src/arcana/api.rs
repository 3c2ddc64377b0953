//! # API Facade
//!
//! The API layer is a thin facade over the command layer and the single entry
//! point for all arcana operations, whichever client drives them.
//!
//! The facade:
//! - **Dispatches** to the matching `commands::*` function
//! - **Normalizes inputs** (spread keys, display indexes, configured language)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no terminal I/O and holds no presentation logic. `ArcanaApi<B>` is
//! generic over the history backend: `FileStore` in production,
//! `InMemoryStore` in tests.
//!
//! Draw sessions are owned by the caller. The API starts them against the
//! standard deck and the configured language, and commands take them by
//! reference, so an interactive loop can keep one session alive across many
//! calls.

use crate::commands::{self, ArcanaPaths, CmdResult};
use crate::config::ArcanaConfig;
use crate::deck::Deck;
use crate::error::Result;
use crate::interpret::{self, InterpretationRequest, Interpreter};
use crate::model::Language;
use crate::session::DrawSession;
use crate::spread;
use crate::store::{HistoryBackend, HistoryStore};
use std::sync::Arc;

pub struct ArcanaApi<B: HistoryBackend> {
    history: HistoryStore<B>,
    paths: ArcanaPaths,
    config: ArcanaConfig,
}

impl<B: HistoryBackend> ArcanaApi<B> {
    pub fn new(backend: B, paths: ArcanaPaths, config: ArcanaConfig) -> Self {
        Self {
            history: HistoryStore::open(backend),
            paths,
            config,
        }
    }

    pub fn language(&self) -> Language {
        self.config.language
    }

    pub fn config(&self) -> &ArcanaConfig {
        &self.config
    }

    pub fn paths(&self) -> &ArcanaPaths {
        &self.paths
    }

    pub fn history(&self) -> &HistoryStore<B> {
        &self.history
    }

    pub fn list_spreads(&self) -> CmdResult {
        commands::spreads::run(self.language())
    }

    pub fn list_cards(&self, query: Option<&str>) -> CmdResult {
        commands::deck::run(Deck::standard(), query)
    }

    /// Resolves `key` and starts a session over the standard deck.
    pub fn start_session(&self, key: &str, count: Option<usize>) -> Result<DrawSession<'static>> {
        let spread = spread::resolve_in(self.language(), key, count)?;
        tracing::debug!(spread = %spread.key, count = spread.count(), "session started");
        Ok(DrawSession::start(Deck::standard(), spread))
    }

    pub fn draw(&self, session: &mut DrawSession<'_>, stop_after: Option<usize>) -> Result<CmdResult> {
        commands::draw::run(session, stop_after)
    }

    pub fn draw_next(&self, session: &mut DrawSession<'_>) -> Result<CmdResult> {
        commands::draw::next(session)
    }

    pub fn save_reading(
        &mut self,
        session: &DrawSession<'_>,
        note: &str,
        question: Option<String>,
    ) -> Result<CmdResult> {
        let language = self.language();
        commands::save::run(&mut self.history, session, note, question, language)
    }

    pub fn list_readings(&self) -> CmdResult {
        commands::history::list(&self.history)
    }

    pub fn show_reading(&self, index: usize) -> Result<CmdResult> {
        commands::history::show(&self.history, index)
    }

    pub fn clear_history(&mut self) -> Result<CmdResult> {
        commands::history::clear(&mut self.history)
    }

    /// The configured backend, wrapped in its timeout.
    pub fn interpreter(&self) -> Result<Arc<dyn Interpreter>> {
        interpret::from_config(&self.config)
    }

    /// Request for the session's current (possibly partial) reading.
    pub fn session_request(
        &self,
        session: &DrawSession<'_>,
        question: Option<String>,
    ) -> InterpretationRequest {
        let language = self.language();
        InterpretationRequest::new(session.spread().name.clone(), session.reading_cards(language))
            .with_question(question)
            .with_language(language)
    }

    pub fn reading_request(&self, index: usize, question: Option<String>) -> Result<InterpretationRequest> {
        commands::interpret::request_for(&self.history, index, question, self.language())
    }

    pub async fn interpret(
        &self,
        interpreter: &dyn Interpreter,
        request: &InterpretationRequest,
    ) -> Result<CmdResult> {
        commands::interpret::run(interpreter, request).await
    }

    pub fn config_action(&mut self, action: commands::config::ConfigAction) -> Result<CmdResult> {
        let result = commands::config::run(&self.paths, action)?;
        if let Some(config) = &result.config {
            self.config = config.clone();
        }
        Ok(result)
    }

    pub async fn doctor(&self) -> Result<CmdResult> {
        commands::doctor::run(&self.history, &self.paths, &self.config).await
    }
}
