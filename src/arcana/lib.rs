//! # Arcana Architecture
//!
//! Arcana is a **tarot reading library** with a command-line client. The
//! library owns the deck, the spread catalog, draw sessions, reading history
//! and the boundary to language models; the CLI only parses arguments and
//! prints what the library returns.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - Runs the interactive session loop                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Applies the configured language and backend              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One module per operation, returns CmdResult              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!              ┌───────────────┼────────────────┐
//!              ▼               ▼                ▼
//!      deck / spread /     store/          interpret/
//!      session / model     history         Interpreter trait
//! ```
//!
//! ## A Reading, End to End
//!
//! 1. [`spread::resolve`] turns a key such as `three_card` into a [`spread::Spread`].
//! 2. [`session::DrawSession`] draws from [`deck::Deck::standard`] without
//!    replacement, one position at a time. Stopping early is allowed.
//! 3. [`session::DrawSession::to_record`] snapshots the drawn cards into a
//!    [`model::ReadingRecord`].
//! 4. [`store::HistoryStore::save`] puts it at the front of the history.
//! 5. An [`interpret::Interpreter`] may turn the reading into prose. It never
//!    touches the session or the history.
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout or stderr and never
//! exits the process. Diagnostics go through `tracing`; the binary decides
//! where they end up.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Logic for each command
//! - [`deck`]: The 78-card deck
//! - [`spread`]: Spread catalog and resolution
//! - [`session`]: Draw sessions
//! - [`model`]: Cards, records and languages
//! - [`store`]: History storage
//! - [`interpret`]: Interpretation backends and prompts
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing, printing and the session loop for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod deck;
pub mod error;
pub mod interpret;
pub mod model;
pub mod session;
pub mod spread;
pub mod store;
