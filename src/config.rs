//! Runtime configuration. Every field has a default, so an empty JSON object
//! (or no config at all) yields the stock 50x25 board.

use serde::Deserialize;

use crate::error::{GameError, GameResult};

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    /// Glyph size in pixels; also the edge length of one cell.
    pub font_size: u32,
    /// Operation budget for a single level script run.
    pub max_operations: u64,
    pub canvas_id: String,
    pub editor_id: String,
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 25,
            font_size: 20,
            max_operations: 1_000_000,
            canvas_id: "ut-screen".to_string(),
            editor_id: "ut-editor".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> GameResult<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json).map_err(GameError::Config)
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
