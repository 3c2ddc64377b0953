use crate::commands::{CmdMessage, CmdResult, IndexedReading};
use crate::error::{ArcanaError, Result};
use crate::store::{HistoryBackend, HistoryStore};

pub fn list<B: HistoryBackend>(store: &HistoryStore<B>) -> CmdResult {
    let readings = store
        .records()
        .iter()
        .enumerate()
        .map(|(i, record)| IndexedReading {
            index: i + 1,
            record: record.clone(),
        })
        .collect();

    let mut result = CmdResult::default().with_readings(readings);
    if let Some(warning) = store.load_warning() {
        result.add_message(CmdMessage::warning(warning));
    }
    if store.is_empty() {
        result.add_message(CmdMessage::info(
            "No saved readings yet. Try `arcana draw three_card --save`.",
        ));
    }
    result
}

pub fn show<B: HistoryBackend>(store: &HistoryStore<B>, index: usize) -> Result<CmdResult> {
    let record = store
        .get(index)
        .cloned()
        .ok_or(ArcanaError::ReadingNotFound(index))?;
    Ok(CmdResult::default().with_readings(vec![IndexedReading { index, record }]))
}

pub fn clear<B: HistoryBackend>(store: &mut HistoryStore<B>) -> Result<CmdResult> {
    let count = store.len();
    let unreadable = store.load_warning().is_some();
    store.clear()?;
    let mut result = CmdResult::default();
    let message = match (count, unreadable) {
        (0, false) => CmdMessage::info("History is already empty."),
        (0, true) => CmdMessage::success("Removed the unreadable history file."),
        _ => CmdMessage::success(format!("Cleared {} reading(s) from history.", count)),
    };
    result.add_message(message);
    Ok(result)
}
