//! Tunable constants and the blueprint catalogue.
//!
//! Everything has a sensible default; a JSON file may override any subset of
//! fields. Unknown fields are rejected so typos don't silently fall back.

use crate::model::Blueprint;
use egui::Color32;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV_VAR: &str = "TOWNSHIP_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CityConfig {
    /// Grid unit for placement snapping.
    pub tile_size: f32,

    pub hud_height: f32,
    pub hud_padding: f32,
    pub button_width: f32,
    pub hud_color: Color32,
    pub button_color: Color32,
    pub label_color: Color32,
    pub label_font_size: f32,
    /// Outline around the HUD button of the active tool.
    pub selected_outline: Color32,

    pub shadow_alpha: f32,
    pub shadow_outline: Color32,
    pub shadow_outline_width: f32,

    pub road_width: f32,
    pub road_color: Color32,

    pub unit_size: f32,
    pub unit_color: Color32,
    pub settler_speed: f32,

    pub background: Color32,

    pub blueprints: Vec<Blueprint>,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            tile_size: 20.0,
            hud_height: 80.0,
            hud_padding: 10.0,
            button_width: 110.0,
            hud_color: Color32::GRAY,
            button_color: Color32::BLUE,
            label_color: Color32::WHITE,
            label_font_size: 16.0,
            selected_outline: Color32::YELLOW,
            shadow_alpha: 0.5,
            shadow_outline: Color32::RED,
            shadow_outline_width: 2.0,
            road_width: 6.0,
            road_color: Color32::from_rgb(120, 100, 80),
            unit_size: 6.0,
            unit_color: Color32::from_rgb(230, 200, 60),
            settler_speed: 1.0,
            background: Color32::from_rgb(70, 120, 60),
            blueprints: default_blueprints(),
        }
    }
}

fn default_blueprints() -> Vec<Blueprint> {
    vec![
        Blueprint {
            name: "house".into(),
            size: 40.0,
            color: Color32::from_rgb(160, 82, 45),
            new_settler: true,
        },
        Blueprint {
            name: "farm".into(),
            size: 60.0,
            color: Color32::from_rgb(218, 165, 32),
            new_settler: false,
        },
        Blueprint {
            name: "warehouse".into(),
            size: 60.0,
            color: Color32::from_rgb(105, 105, 105),
            new_settler: false,
        },
    ]
}

impl CityConfig {
    pub fn blueprint(&self, name: &str) -> Option<&Blueprint> {
        self.blueprints.iter().find(|b| b.name == name)
    }

    /// # Errors
    ///
    /// Malformed JSON, unknown fields or a non-positive tile size.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Anything [`Self::from_json_str`] rejects, plus I/O failures.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!(
            "Loaded config from {} ({} blueprints)",
            path.display(),
            config.blueprints.len()
        );
        Ok(config)
    }

    /// Load from the file named by [`CONFIG_ENV_VAR`], or fall back to defaults.
    pub fn from_env() -> Self {
        let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        match Self::load(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config {path}: {e}");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(ConfigError::InvalidTileSize(self.tile_size));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Snapping needs a positive, finite tile size.
    InvalidTileSize(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::InvalidTileSize(size) => write!(f, "invalid tile size: {size}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::InvalidTileSize(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
