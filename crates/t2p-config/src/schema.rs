//! Configuration schema.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::loader::ConfigLoader;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Current user for todo operations; falls back to `$USER`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    /// Named teams for `todo approval assign --team`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub teams: BTreeMap<String, Vec<String>>,
}

/// Data file locations; `~` is expanded at resolution time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilesConfig {
    #[serde(default = "default_todo_file")]
    pub todo_file: String,

    #[serde(default = "default_notes_file")]
    pub notes_file: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            todo_file: default_todo_file(),
            notes_file: default_notes_file(),
        }
    }
}

/// LLM endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
            model: default_model(),
            cache_dir: default_cache_dir(),
        }
    }
}

fn default_todo_file() -> String {
    "~/.t2p/master-todo.md".to_string()
}

fn default_notes_file() -> String {
    "~/.t2p/master-notes.md".to_string()
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    "http://localhost:11434/api/generate".to_string()
}

fn default_model() -> String {
    "qwen:1.5-0.5b-chat-q4_0".to_string()
}

fn default_cache_dir() -> String {
    "~/.t2p/cache/llm".to_string()
}

impl Config {
    /// Default config file location (`~/.t2p/config.toml`).
    pub fn default_path() -> PathBuf {
        Config::data_dir().join("config.toml")
    }

    /// Base data directory (`~/.t2p`, or relative when home is unknown).
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(".t2p"))
            .unwrap_or_else(|| PathBuf::from(".t2p"))
    }

    /// The current user: configured name, `$USER`, or `default-user`.
    pub fn current_user(&self) -> String {
        self.user
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_else(|| "default-user".to_string())
    }

    /// Todo file path with `~` expanded.
    pub fn todo_file(&self) -> PathBuf {
        PathBuf::from(ConfigLoader::expand_path(&self.files.todo_file))
    }

    /// Notes file path with `~` expanded.
    pub fn notes_file(&self) -> PathBuf {
        PathBuf::from(ConfigLoader::expand_path(&self.files.notes_file))
    }

    /// LLM cache directory with `~` expanded.
    pub fn llm_cache_dir(&self) -> PathBuf {
        PathBuf::from(ConfigLoader::expand_path(&self.llm.cache_dir))
    }

    /// Effective LLM endpoint; the `LLM_ENDPOINT` env var wins over config.
    pub fn llm_endpoint(&self) -> String {
        std::env::var("LLM_ENDPOINT").unwrap_or_else(|_| self.llm.endpoint.clone())
    }

    /// Members of a named team.
    pub fn team(&self, name: &str) -> Option<&[String]> {
        self.teams.get(name).map(|members| members.as_slice())
    }

    /// Check value constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.llm.endpoint.starts_with("http://") && !self.llm.endpoint.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                field: "llm.endpoint".to_string(),
                message: "must be an http(s) URL".to_string(),
            });
        }
        for (name, members) in &self.teams {
            if members.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("teams.{name}"),
                    message: "team must have at least one member".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.llm.enabled);
        assert_eq!(config.llm.endpoint, "http://localhost:11434/api/generate");
        assert_eq!(config.llm.model, "qwen:1.5-0.5b-chat-q4_0");
        assert!(config.files.todo_file.ends_with("master-todo.md"));
        assert!(config.teams.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_current_user_prefers_config() {
        let config = Config {
            user: Some("alice".to_string()),
            ..Config::default()
        };
        assert_eq!(config.current_user(), "alice");
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let config = Config {
            llm: LlmConfig {
                endpoint: "localhost:11434".to_string(),
                ..LlmConfig::default()
            },
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_team() {
        let mut config = Config::default();
        config.teams.insert("core".to_string(), vec![]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_team_lookup() {
        let mut config = Config::default();
        config
            .teams
            .insert("core".to_string(), vec!["alice".to_string()]);
        assert_eq!(config.team("core"), Some(&["alice".to_string()][..]));
        assert!(config.team("other").is_none());
    }
}
