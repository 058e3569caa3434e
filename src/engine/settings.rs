//! Game settings loaded from TOML at startup.
//!
//! Every field is optional in the file; missing ones fall back to the
//! built-in defaults (human vs hard bot, bot plays O, 300ms bot delay).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::bot_strategy::Difficulty;
use crate::engine::game::{GameConfig, GameMode};
use crate::engine::models::Symbol;

pub const DEFAULT_BOT_DELAY_MS: u64 = 300;
pub const MAX_BOT_DELAY_MS: u64 = 10_000;

const SETTINGS_CANDIDATES: [&str; 3] = [
    "tictactoe.toml",
    "../tictactoe.toml",
    "/etc/tictactoe/tictactoe.toml",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameSettings {
    #[serde(default)]
    pub mode: GameMode,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_bot_symbol")]
    pub bot_symbol: Symbol,
    /// Pause before the bot answers a human move. Pacing only.
    #[serde(default = "default_bot_delay_ms")]
    pub bot_delay_ms: u64,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_bot_symbol() -> Symbol {
    Symbol::O
}

fn default_bot_delay_ms() -> u64 {
    DEFAULT_BOT_DELAY_MS
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            difficulty: Difficulty::default(),
            bot_symbol: default_bot_symbol(),
            bot_delay_ms: DEFAULT_BOT_DELAY_MS,
            seed: None,
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.bot_delay_ms > MAX_BOT_DELAY_MS {
            return Err(format!(
                "bot_delay_ms ({}) cannot exceed {}",
                self.bot_delay_ms, MAX_BOT_DELAY_MS
            ));
        }
        Ok(())
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            mode: self.mode,
            difficulty: self.difficulty,
            bot_symbol: self.bot_symbol,
            seed: self.seed,
        }
    }
}

/// Parse and validate settings from TOML text.
pub fn parse_settings(content: &str) -> Result<GameSettings, String> {
    let settings: GameSettings =
        toml::from_str(content).map_err(|e| format!("Failed to parse settings: {}", e))?;
    settings
        .validate()
        .map_err(|e| format!("Settings validation error: {}", e))?;
    Ok(settings)
}

/// Load settings from a TOML file at the given path.
pub fn load_settings(path: &Path) -> Result<GameSettings, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    parse_settings(&content).map_err(|e| format!("{}: {}", path.display(), e))
}

/// Try well-known paths, returning the defaults if none loads.
pub fn load_default_settings() -> GameSettings {
    for path in &SETTINGS_CANDIDATES {
        let p = Path::new(path);
        if p.exists() {
            match load_settings(p) {
                Ok(settings) => {
                    tracing::info!(path = %p.display(), "loaded game settings");
                    return settings;
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "failed to load game settings");
                }
            }
        }
    }
    tracing::info!("no tictactoe.toml found, using built-in defaults");
    GameSettings::default()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(parse_settings("").unwrap(), GameSettings::default());
    }

    #[test]
    fn test_full_file() {
        let settings = parse_settings(
            r#"
            mode = "human_vs_human"
            difficulty = "medium"
            bot_symbol = "x"
            bot_delay_ms = 0
            seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(settings.mode, GameMode::HumanVsHuman);
        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert_eq!(settings.bot_symbol, Symbol::X);
        assert_eq!(settings.bot_delay_ms, 0);
        assert_eq!(settings.game_config().seed, Some(42));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(parse_settings("difficulty = \"impossible\"").is_err());
        assert!(parse_settings("bot_delay_ms = 60000").is_err());
        assert!(parse_settings("board_size = 4").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "difficulty = \"easy\"").unwrap();
        let settings = load_settings(file.path()).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Easy);
        assert_eq!(settings.bot_delay_ms, DEFAULT_BOT_DELAY_MS);
    }

    #[test]
    fn test_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_settings(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.contains("Failed to read"));
    }
}
