//! # Arcana CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/arcana/cli/`, and
//! this file only starts the runtime, invokes `cli::run()` and handles process
//! termination. Everything the CLI does goes through [`arcana::api::ArcanaApi`].
//!
//! ```text
//! main.rs ──▶ cli::run ──▶ ArcanaApi ──▶ commands::* ──▶ deck / session / store / interpret
//! ```
//!
//! Testing follows the library layers: command logic is unit tested next to
//! each command, the API facade gets dispatch tests, and `tests/` drives the
//! compiled binary with `assert_cmd`.

mod cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
