//! # Configuration
//!
//! Settings live in `config.json` inside the data directory. A missing file
//! means defaults; missing keys fall back to their defaults individually, so
//! older config files keep working as settings are added.
//!
//! | Key              | Default                        | Description                              |
//! |------------------|--------------------------------|------------------------------------------|
//! | `language`       | `en`                           | Card names, labels and reading language  |
//! | `backend`        | `ollama`                       | `ollama`, `openrouter` or `none`         |
//! | `model`          | backend default                | Model name passed to the backend         |
//! | `timeout-secs`   | `60`                           | Upper bound for one interpretation       |
//! | `ollama-command` | `ollama`                       | Executable used for the local backend    |
//! | `openrouter-url` | `https://openrouter.ai/api/v1` | Base URL of the hosted backend           |
//!
//! The OpenRouter API key is read from `OPENROUTER_API_KEY` only and is
//! never written to this file.

use crate::error::{ArcanaError, Result};
use crate::model::Language;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

const CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_OLLAMA_COMMAND: &str = "ollama";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1:8b";
pub const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_OPENROUTER_MODEL: &str = "deepseek/deepseek-chat";

pub const KEYS: &[&str] = &[
    "language",
    "backend",
    "model",
    "timeout-secs",
    "ollama-command",
    "openrouter-url",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Ollama,
    OpenRouter,
    None,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Ollama => "ollama",
            Backend::OpenRouter => "openrouter",
            Backend::None => "none",
        };
        f.write_str(name)
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Backend::Ollama),
            "openrouter" => Ok(Backend::OpenRouter),
            "none" | "off" => Ok(Backend::None),
            other => Err(format!(
                "Unknown backend: {} (expected ollama, openrouter or none)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ArcanaConfig {
    #[serde(default)]
    pub language: Language,

    #[serde(default)]
    pub backend: Backend,

    /// Overrides the backend's default model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_ollama_command")]
    pub ollama_command: String,

    #[serde(default = "default_openrouter_url")]
    pub openrouter_url: String,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_ollama_command() -> String {
    DEFAULT_OLLAMA_COMMAND.to_string()
}

fn default_openrouter_url() -> String {
    DEFAULT_OPENROUTER_URL.to_string()
}

impl Default for ArcanaConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            backend: Backend::default(),
            model: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            ollama_command: default_ollama_command(),
            openrouter_url: default_openrouter_url(),
        }
    }
}

impl ArcanaConfig {
    /// Load config from the given directory, or return defaults if not found.
    /// A file that does not parse is logged and treated as missing, so
    /// `arcana config <key> <value>` can still overwrite it.
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(ArcanaError::Io)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %e,
                    "config file is unreadable, using defaults"
                );
                Ok(Self::default())
            }
        }
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(ArcanaError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(ArcanaError::Serialization)?;
        fs::write(config_path, content).map_err(ArcanaError::Io)?;
        Ok(())
    }

    /// The model to request, falling back to the backend's default.
    pub fn model_name(&self) -> String {
        if let Some(model) = &self.model {
            return model.clone();
        }
        match self.backend {
            Backend::OpenRouter => std::env::var("OPENROUTER_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENROUTER_MODEL.to_string()),
            Backend::Ollama | Backend::None => DEFAULT_OLLAMA_MODEL.to_string(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "language" => Some(self.language.to_string()),
            "backend" => Some(self.backend.to_string()),
            "model" => Some(self.model_name()),
            "timeout-secs" => Some(self.timeout_secs.to_string()),
            "ollama-command" => Some(self.ollama_command.clone()),
            "openrouter-url" => Some(self.openrouter_url.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "language" => self.language = value.parse()?,
            "backend" => self.backend = value.parse()?,
            "model" => {
                let value = value.trim();
                self.model = if value.is_empty() || value == "default" {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "timeout-secs" => {
                let secs: u64 = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("Invalid timeout: {}", value))?;
                if secs == 0 {
                    return Err("Timeout must be at least 1 second".to_string());
                }
                self.timeout_secs = secs;
            }
            "ollama-command" => {
                if value.trim().is_empty() {
                    return Err("ollama-command cannot be empty".to_string());
                }
                self.ollama_command = value.trim().to_string();
            }
            "openrouter-url" => {
                self.openrouter_url = value.trim().trim_end_matches('/').to_string();
            }
            other => return Err(format!("Unknown config key: {}", other)),
        }
        Ok(())
    }

    pub fn list_all(&self) -> Vec<(&'static str, String)> {
        KEYS.iter()
            .filter_map(|k| self.get(k).map(|v| (*k, v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ArcanaConfig::default();
        assert_eq!(config.language, Language::En);
        assert_eq!(config.backend, Backend::Ollama);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.model_name(), DEFAULT_OLLAMA_MODEL);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = ArcanaConfig::load(dir.path()).unwrap();
        assert_eq!(config, ArcanaConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let mut config = ArcanaConfig::default();
        config.set("language", "ko").unwrap();
        config.set("backend", "openrouter").unwrap();
        config.set("model", "some/model").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = ArcanaConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.language, Language::Ko);
        assert_eq!(loaded.backend, Backend::OpenRouter);
        assert_eq!(loaded.model_name(), "some/model");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"language": "ko"}"#).unwrap();
        let loaded = ArcanaConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.language, Language::Ko);
        assert_eq!(loaded.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(loaded.ollama_command, DEFAULT_OLLAMA_COMMAND);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{ \"language\": ").unwrap();
        let loaded = ArcanaConfig::load(dir.path()).unwrap();
        assert_eq!(loaded, ArcanaConfig::default());
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = ArcanaConfig::default();
        assert!(config.set("language", "fr").is_err());
        assert!(config.set("backend", "gpt").is_err());
        assert!(config.set("timeout-secs", "0").is_err());
        assert!(config.set("timeout-secs", "soon").is_err());
        assert!(config.set("colour", "blue").is_err());
        assert_eq!(config, ArcanaConfig::default());
    }

    #[test]
    fn test_model_reset_to_default() {
        let mut config = ArcanaConfig::default();
        config.set("model", "mistral").unwrap();
        assert_eq!(config.model_name(), "mistral");
        config.set("model", "default").unwrap();
        assert_eq!(config.model, None);
    }

    #[test]
    fn test_url_trailing_slash_trimmed() {
        let mut config = ArcanaConfig::default();
        config.set("openrouter-url", "http://localhost:8080/v1/").unwrap();
        assert_eq!(config.openrouter_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_list_all_covers_keys() {
        let config = ArcanaConfig::default();
        let keys: Vec<_> = config.list_all().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, KEYS);
    }

    #[test]
    fn test_serialization_uses_kebab_case() {
        let json = serde_json::to_string(&ArcanaConfig::default()).unwrap();
        assert!(json.contains("\"timeout-secs\""));
        assert!(json.contains("\"backend\":\"ollama\""));
    }
}
