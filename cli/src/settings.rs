use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use minesweeper_core::{BoardConfig, CellCount, Coord, Format};
use serde::{Deserialize, Serialize};

/// Settings file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "minesweeper.toml";

/// User settings, persisted as TOML. Command-line flags override them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rows: Coord,
    pub columns: Coord,
    pub mines: CellCount,
    pub save_path: PathBuf,
    /// Guessed from the save path extension when unset
    pub format: Option<Format>,
    /// Fixed seed for reproducible layouts
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        let config = BoardConfig::EXPERT;
        Self {
            rows: config.rows(),
            columns: config.columns(),
            mines: config.mines,
            save_path: PathBuf::from("save_game.txt"),
            format: None,
            seed: None,
        }
    }
}

impl Settings {
    /// Reads `path`, or [`DEFAULT_CONFIG`] if it exists, or falls back to defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG).exists() => Path::new(DEFAULT_CONFIG),
            None => {
                log::debug!("no settings file, using defaults");
                return Ok(Self::default());
            }
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("could not read settings {}", path.display()))?;
        let settings = Self::parse(&text)
            .with_context(|| format!("invalid settings {}", path.display()))?;
        log::debug!("settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Board config for these settings, clamped so mine placement always terminates.
    pub fn board_config(&self) -> BoardConfig {
        let config = BoardConfig::clamped(self.rows, self.columns, self.mines);
        if config.size != (self.rows, self.columns) || config.mines != self.mines {
            log::warn!(
                "clamped board {}x{} with {} mines to {}x{} with {}",
                self.rows,
                self.columns,
                self.mines,
                config.rows(),
                config.columns(),
                config.mines
            );
        }
        config
    }

    pub fn format(&self) -> Format {
        self.format
            .or_else(|| Format::from_extension(&self.save_path))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = Settings::parse("").unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.board_config(), BoardConfig::EXPERT);
        assert_eq!(settings.format(), Format::Text);
    }

    #[test]
    fn partial_file_overrides_fields() {
        let settings = Settings::parse(
            r#"
            rows = 9
            columns = 9
            mines = 10
            save_path = "game.json"
            seed = 42
            "#,
        )
        .unwrap();

        assert_eq!(settings.board_config(), BoardConfig::BEGINNER);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.format(), Format::Json);
    }

    #[test]
    fn explicit_format_beats_extension() {
        let settings = Settings::parse(
            r#"
            save_path = "game.json"
            format = "binary"
            "#,
        )
        .unwrap();

        assert_eq!(settings.format(), Format::Binary);
    }

    #[test]
    fn oversized_mine_count_is_clamped() {
        let settings = Settings {
            rows: 3,
            columns: 3,
            mines: 50,
            ..Settings::default()
        };

        assert_eq!(settings.board_config().mines, 8);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Settings::parse(r#"format = "xml""#).is_err());
    }
}
