use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Correct answers needed to finish the quiz.
    #[serde(default = "default_win_target")]
    pub win_target: usize,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
    #[serde(default = "default_correct_modal_delay_ms")]
    pub correct_modal_delay_ms: u64,
    /// Question bank to load instead of the bundled sample.
    #[serde(default)]
    pub question_bank: Option<PathBuf>,
    #[serde(default = "default_analytics_enabled")]
    pub analytics_enabled: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_win_target() -> usize {
    10
}
fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_sound_enabled() -> bool {
    true
}
fn default_correct_modal_delay_ms() -> u64 {
    500
}
fn default_analytics_enabled() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Default for Config {
    fn default() -> Self {
        Self {
            win_target: default_win_target(),
            theme: default_theme(),
            sound_enabled: default_sound_enabled(),
            correct_modal_delay_ms: default_correct_modal_delay_ms(),
            question_bank: None,
            analytics_enabled: default_analytics_enabled(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rockbusters")
            .join("config.toml")
    }

    /// Bring values loaded from disk or the command line back into range
    /// for a bank of `question_count` questions.
    pub fn validate(&mut self, question_count: usize) {
        let max_target = question_count.max(1);
        let clamped = self.win_target.clamp(1, max_target);
        if clamped != self.win_target {
            warn!(
                requested = self.win_target,
                clamped, "Win target out of range for question bank"
            );
            self.win_target = clamped;
        }

        let level = self.log_level.to_ascii_lowercase();
        if LOG_LEVELS.contains(&level.as_str()) {
            self.log_level = level;
        } else {
            self.log_level = default_log_level();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.win_target, 10);
        assert_eq!(config.correct_modal_delay_ms, 500);
        assert!(config.sound_enabled);
        assert!(config.question_bank.is_none());
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
win_target = 5
theme = "studio"
sound_enabled = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.win_target, 5);
        assert_eq!(config.theme, "studio");
        assert!(!config.sound_enabled);
        assert_eq!(config.log_level, "info");
        assert!(config.analytics_enabled);
    }

    #[test]
    fn test_config_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            win_target: 3,
            question_bank: Some(PathBuf::from("/tmp/bank.json")),
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validate_clamps_win_target() {
        let mut config = Config {
            win_target: 50,
            ..Config::default()
        };
        config.validate(24);
        assert_eq!(config.win_target, 24);

        config.win_target = 0;
        config.validate(24);
        assert_eq!(config.win_target, 1);
    }

    #[test]
    fn test_validate_resets_unknown_log_level() {
        let mut config = Config {
            log_level: "LOUD".to_string(),
            ..Config::default()
        };
        config.validate(10);
        assert_eq!(config.log_level, "info");

        config.log_level = "DEBUG".to_string();
        config.validate(10);
        assert_eq!(config.log_level, "debug");
    }
}
