use super::HistoryBackend;
use crate::error::{ArcanaError, Result};
use crate::model::ReadingRecord;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const HISTORY_FILENAME: &str = "history.json";

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn history_path(&self) -> PathBuf {
        self.root.join(HISTORY_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(ArcanaError::Io)?;
        }
        Ok(())
    }
}

impl HistoryBackend for FileStore {
    fn load(&self) -> Result<Option<Vec<ReadingRecord>>> {
        let path = self.history_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(ArcanaError::Io)?;
        let records: Vec<ReadingRecord> =
            serde_json::from_str(&content).map_err(ArcanaError::Serialization)?;
        Ok(Some(records))
    }

    fn save(&self, records: &[ReadingRecord]) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(records).map_err(ArcanaError::Serialization)?;

        let tmp_file = self.root.join(format!(".history-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(ArcanaError::Io)?;
        if let Err(e) = fs::rename(&tmp_file, self.history_path()) {
            let _ = fs::remove_file(&tmp_file);
            return Err(ArcanaError::Io(e));
        }
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        match fs::remove_file(self.history_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ArcanaError::Io(e)),
        }
    }

    fn location(&self) -> String {
        self.history_path().display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReadingCard;
    use crate::store::HistoryStore;
    use tempfile::TempDir;

    fn record(card: &str) -> ReadingRecord {
        ReadingRecord::new("Three Card", vec![ReadingCard::new("Past", card)])
            .with_note("a note")
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_then_fresh_load_returns_record_first() {
        let dir = TempDir::new().unwrap();
        let saved = record("The Hermit");
        {
            let mut history = HistoryStore::open(FileStore::new(dir.path().to_path_buf()));
            history.save(saved.clone()).unwrap();
        }
        let reloaded = HistoryStore::open(FileStore::new(dir.path().to_path_buf()));
        assert_eq!(reloaded.records().first(), Some(&saved));
    }

    #[test]
    fn two_saves_reload_newest_first() {
        let dir = TempDir::new().unwrap();
        let a = record("A");
        let b = record("B");
        {
            let mut history = HistoryStore::open(FileStore::new(dir.path().to_path_buf()));
            history.save(a.clone()).unwrap();
            history.save(b.clone()).unwrap();
        }
        let reloaded = HistoryStore::open(FileStore::new(dir.path().to_path_buf()));
        assert_eq!(reloaded.records(), &[b, a]);
    }

    #[test]
    fn creates_missing_data_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("deeper").join("still");
        let store = FileStore::new(nested.clone());
        store.save(&[record("The Star")]).unwrap();
        assert!(nested.join(HISTORY_FILENAME).exists());
    }

    #[test]
    fn no_tmp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        store.save(&[record("Justice")]).unwrap();
        store.save(&[record("Justice"), record("Death")]).unwrap();

        for entry in fs::read_dir(dir.path()).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().to_string();
            assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
        }
    }

    #[test]
    fn corrupt_file_opens_empty_with_warning() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(HISTORY_FILENAME), "{ not json").unwrap();
        let history = HistoryStore::open(FileStore::new(dir.path().to_path_buf()));
        assert!(history.is_empty());
        assert!(history.load_warning().unwrap().contains(HISTORY_FILENAME));
    }

    #[test]
    fn clear_removes_file_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut history = HistoryStore::open(FileStore::new(dir.path().to_path_buf()));
        history.save(record("The Sun")).unwrap();
        assert!(dir.path().join(HISTORY_FILENAME).exists());

        history.clear().unwrap();
        assert!(history.is_empty());
        assert!(!dir.path().join(HISTORY_FILENAME).exists());

        history.clear().unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn legacy_file_round_trips() {
        let dir = TempDir::new().unwrap();
        let legacy = r#"[
  {
    "date": "2024-03-01 21:15:09",
    "spread": "3장 리딩",
    "cards": [
      { "position": "과거", "card": "0. 바보 카드", "path": "cards/0. 바보 카드.jpg" }
    ],
    "note": ""
  }
]"#;
        fs::write(dir.path().join(HISTORY_FILENAME), legacy).unwrap();

        let mut history = HistoryStore::open(FileStore::new(dir.path().to_path_buf()));
        assert_eq!(history.len(), 1);
        let old = history.records()[0].clone();
        history.save(record("The Moon")).unwrap();

        let reloaded = HistoryStore::open(FileStore::new(dir.path().to_path_buf()));
        assert_eq!(reloaded.records()[1], old);
        assert_eq!(
            reloaded.records()[1].cards[0].path.as_deref(),
            Some("cards/0. 바보 카드.jpg")
        );
    }
}
