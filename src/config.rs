//! TOML configuration for the dialogue box.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::{DialogueError, DialogueResult};
use crate::render::FixedMetrics;
use crate::resource::ResourceLimiter;
use crate::script::DEFAULT_PLACEHOLDER;
use crate::speaker::{SpeakerId, SpeakerName, SpeakerRegistry};

/// Per-speaker overrides, keyed by speaker id in the `[speakers]` table.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct SpeakerOverride {
    pub name: Option<String>,
    pub color: Option<Rgba>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DialogueConfig {
    pub char_delay_ms: u64,
    pub placeholder: String,
    pub max_name_length: usize,
    pub max_line_width: Option<f32>,
    pub glyph_width: f32,
    pub line_height: f32,
    pub default_text_color: Rgba,
    pub speakers: BTreeMap<String, SpeakerOverride>,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            char_delay_ms: 20,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            max_name_length: ResourceLimiter::default().max_name_length,
            max_line_width: None,
            glyph_width: 8.0,
            line_height: 16.0,
            default_text_color: Rgba::WHITE,
            speakers: BTreeMap::new(),
        }
    }
}

impl DialogueConfig {
    pub fn from_toml_str(input: &str) -> DialogueResult<Self> {
        toml::from_str(input).map_err(|err| DialogueError::Config(err.to_string()))
    }

    pub fn load_from(path: &Path) -> DialogueResult<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn save_to(&self, path: &Path) -> DialogueResult<()> {
        let raw =
            toml::to_string_pretty(self).map_err(|err| DialogueError::Config(err.to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, raw)?;
        Ok(())
    }

    /// Validates the config and builds the runtime values.
    pub fn resolve(&self) -> DialogueResult<ResolvedConfig> {
        if self.placeholder.is_empty() {
            return Err(DialogueError::Config("placeholder cannot be empty".to_string()));
        }
        if self.max_name_length == 0 {
            return Err(DialogueError::Config(
                "max_name_length must be positive".to_string(),
            ));
        }
        if !(self.glyph_width > 0.0 && self.line_height > 0.0) {
            return Err(DialogueError::Config(
                "glyph_width and line_height must be positive".to_string(),
            ));
        }

        let mut registry = SpeakerRegistry::default();
        for (key, speaker) in &self.speakers {
            let id: SpeakerId = key.parse().map_err(DialogueError::Config)?;
            if let Some(name) = &speaker.name {
                if id == SpeakerId::Player {
                    return Err(DialogueError::Config(
                        "the player's name is chosen in game and cannot be configured"
                            .to_string(),
                    ));
                }
                registry.set_name(id, SpeakerName::Fixed(name.clone()));
            }
            if let Some(color) = speaker.color {
                registry.set_color(id, color);
            }
        }

        let limits = ResourceLimiter {
            max_name_length: self.max_name_length,
            ..ResourceLimiter::default()
        };

        Ok(ResolvedConfig {
            char_delay: Duration::from_millis(self.char_delay_ms),
            placeholder: self.placeholder.clone(),
            max_line_width: self.max_line_width,
            metrics: FixedMetrics {
                glyph_width: self.glyph_width,
                line_height: self.line_height,
            },
            default_text_color: self.default_text_color,
            registry,
            limits,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedConfig {
    pub char_delay: Duration,
    pub placeholder: String,
    pub max_line_width: Option<f32>,
    pub metrics: FixedMetrics,
    pub default_text_color: Rgba,
    pub registry: SpeakerRegistry,
    pub limits: ResourceLimiter,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let config = DialogueConfig::default();
        Self {
            char_delay: Duration::from_millis(config.char_delay_ms),
            placeholder: config.placeholder,
            max_line_width: config.max_line_width,
            metrics: FixedMetrics::default(),
            default_text_color: config.default_text_color,
            registry: SpeakerRegistry::default(),
            limits: ResourceLimiter::default(),
        }
    }
}
