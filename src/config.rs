use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_autosave_secs() -> u64 {
    5
}

fn default_confirm_delete() -> bool {
    true
}

fn default_date_format() -> String {
    "%A, %b %-d %Y, %-I:%M %p".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory where notes are stored. Unset on first run until the user
    /// picks a folder.
    pub notes_dir: Option<String>,
    /// Idle window in seconds before a dirty note is flushed to disk.
    #[serde(default = "default_autosave_secs")]
    pub autosave_secs: u64,
    /// Ask before deleting a note.
    #[serde(default = "default_confirm_delete")]
    pub confirm_delete: bool,
    /// chrono format string for the date shown under each note in the sidebar.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notes_dir: None,
            autosave_secs: default_autosave_secs(),
            confirm_delete: default_confirm_delete(),
            date_format: default_date_format(),
        }
    }
}

impl Config {
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| {
                PathBuf::from(std::env::var("HOME").unwrap_or_default()).join(".config")
            })
            .join("flatnote")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load the config, falling back to defaults if the file is missing or
    /// does not parse. A broken config should never keep the app from starting.
    pub fn load() -> Self {
        let path = Self::config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("invalid config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, contents)
    }

    /// The notes directory with `~` expanded, if one has been chosen.
    pub fn notes_dir(&self) -> Option<PathBuf> {
        self.notes_dir
            .as_deref()
            .map(|dir| PathBuf::from(shellexpand::tilde(dir).to_string()))
    }

    pub fn set_notes_dir(&mut self, dir: &std::path::Path) {
        self.notes_dir = Some(dir.to_string_lossy().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.autosave_secs, 5);
        assert!(config.confirm_delete);
        assert!(config.notes_dir.is_none());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = toml::from_str("notes_dir = \"/tmp/notes\"").unwrap();
        assert_eq!(config.notes_dir.as_deref(), Some("/tmp/notes"));
        assert_eq!(config.autosave_secs, 5);
    }

    #[test]
    fn test_tilde_expansion() {
        let config = Config {
            notes_dir: Some("~/notes".to_string()),
            ..Config::default()
        };
        let dir = config.notes_dir().unwrap();
        assert!(!dir.to_string_lossy().starts_with('~'));
    }
}
