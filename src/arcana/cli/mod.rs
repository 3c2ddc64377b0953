//! # CLI Behavior
//!
//! This is one possible client for arcana, not the application itself. The
//! CLI is the only place that knows about terminal I/O, exit codes and output
//! formatting. For the overall architecture, see the library docs.
//!
//! ## Naked Execution (`arcana`)
//!
//! Running `arcana` with no arguments lists the reading history, newest first.
//!
//! ## One-Shot vs Interactive
//!
//! - `arcana draw three_card --save` draws the whole spread, prints it and
//!   optionally saves and interprets it in one go.
//! - `arcana session three_card` keeps the session open: draw card by card,
//!   save partial readings, and ask for interpretations that finish in the
//!   background while you keep drawing.
//!
//! ## Module Structure
//!
//! - `commands`: Dispatch and per-command handlers
//! - `print`: Output formatting (colors, aligned columns, relative times)
//! - `session`: The interactive session loop
//! - `setup`: Argument parsing via clap, grouped help text

mod commands;
mod print;
mod session;
pub mod setup;

pub use commands::run;
