use crate::commands::{ArcanaPaths, CmdMessage, CmdResult};
use crate::config::{ArcanaConfig, Backend};
use crate::error::Result;
use crate::interpret;
use crate::store::{HistoryBackend, HistoryStore};

/// Reports on the data directory, the history file and the configured
/// interpretation backend. Problems are messages; only I/O on the config
/// file itself is an error.
pub async fn run<B: HistoryBackend>(
    store: &HistoryStore<B>,
    paths: &ArcanaPaths,
    config: &ArcanaConfig,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    result.add_message(CmdMessage::info(format!(
        "Data directory: {}",
        paths.data_dir.display()
    )));

    match store.load_warning() {
        Some(warning) => result.add_message(CmdMessage::warning(warning)),
        None => result.add_message(CmdMessage::success(format!(
            "History: {} reading(s) at {}",
            store.len(),
            store.backend().location()
        ))),
    }

    if config.backend == Backend::None {
        result.add_message(CmdMessage::info("Interpretations are disabled (backend = none)."));
        return Ok(result);
    }

    match interpret::from_config(config) {
        Ok(interpreter) => match interpreter.health_check().await {
            Ok(status) => result.add_message(CmdMessage::success(format!(
                "Backend {}: {}",
                interpreter.name(),
                status
            ))),
            Err(e) => result.add_message(CmdMessage::error(format!(
                "Backend {}: {}",
                interpreter.name(),
                e
            ))),
        },
        Err(e) => result.add_message(CmdMessage::error(format!(
            "Backend {}: {}",
            config.backend, e
        ))),
    }

    Ok(result)
}
