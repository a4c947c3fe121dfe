//! Closed speaker set and the registry that maps it to highlight tokens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// Every speaker a script may reference. The set is fixed at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerId {
    Narrator,
    Storyteller,
    Player,
    Tory,
    Elder,
    Ember,
    Cinder,
}

impl SpeakerId {
    pub const ALL: [SpeakerId; 7] = [
        SpeakerId::Narrator,
        SpeakerId::Storyteller,
        SpeakerId::Player,
        SpeakerId::Tory,
        SpeakerId::Elder,
        SpeakerId::Ember,
        SpeakerId::Cinder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SpeakerId::Narrator => "narrator",
            SpeakerId::Storyteller => "storyteller",
            SpeakerId::Player => "player",
            SpeakerId::Tory => "tory",
            SpeakerId::Elder => "elder",
            SpeakerId::Ember => "ember",
            SpeakerId::Cinder => "cinder",
        }
    }
}

impl fmt::Display for SpeakerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpeakerId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SpeakerId::ALL
            .into_iter()
            .find(|id| id.as_str() == value)
            .ok_or_else(|| format!("unknown speaker '{value}'"))
    }
}

/// How a speaker's display name is obtained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeakerName {
    Fixed(String),
    /// Resolved from [`RenderContext::player_name`] on every render pass.
    Player,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeakerEntry {
    pub id: SpeakerId,
    pub name: SpeakerName,
    pub color: Rgba,
}

/// A display name paired with its highlight color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeakerToken<'a> {
    pub display_name: &'a str,
    pub color: Rgba,
}

impl<'a> SpeakerToken<'a> {
    pub fn new(display_name: &'a str, color: Rgba) -> Self {
        Self {
            display_name,
            color,
        }
    }
}

/// Live values read at colorize time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderContext {
    pub player_name: String,
}

impl RenderContext {
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
        }
    }

    pub fn has_player_name(&self) -> bool {
        !self.player_name.is_empty()
    }
}

/// Speaker table in highlight priority order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeakerRegistry {
    entries: Vec<SpeakerEntry>,
}

impl Default for SpeakerRegistry {
    fn default() -> Self {
        let fixed = |id, name: &str, color| SpeakerEntry {
            id,
            name: SpeakerName::Fixed(name.to_string()),
            color,
        };
        Self {
            entries: vec![
                fixed(SpeakerId::Narrator, "", Rgba::WHITE),
                fixed(SpeakerId::Storyteller, "Storyteller", Rgba::rgb(180, 140, 255)),
                SpeakerEntry {
                    id: SpeakerId::Player,
                    name: SpeakerName::Player,
                    color: Rgba::rgb(110, 220, 140),
                },
                fixed(SpeakerId::Tory, "Tory", Rgba::GOLD),
                fixed(SpeakerId::Elder, "Elder", Rgba::rgb(160, 200, 220)),
                fixed(SpeakerId::Ember, "Ember", Rgba::RED),
                fixed(SpeakerId::Cinder, "Cinder", Rgba::rgb(255, 120, 60)),
            ],
        }
    }
}

impl SpeakerRegistry {
    /// Builds a registry from explicit entries; order is highlight priority.
    pub fn new(entries: Vec<SpeakerEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[SpeakerEntry] {
        &self.entries
    }

    pub fn entry(&self, id: SpeakerId) -> Option<&SpeakerEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn color(&self, id: SpeakerId) -> Option<Rgba> {
        self.entry(id).map(|entry| entry.color)
    }

    /// Current display name, with the player's name taken from `ctx`.
    pub fn display_name<'a>(&'a self, id: SpeakerId, ctx: &'a RenderContext) -> &'a str {
        match self.entry(id).map(|entry| &entry.name) {
            Some(SpeakerName::Fixed(name)) => name.as_str(),
            Some(SpeakerName::Player) => ctx.player_name.as_str(),
            None => "",
        }
    }

    pub fn set_name(&mut self, id: SpeakerId, name: SpeakerName) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) {
            entry.name = name;
        }
    }

    pub fn set_color(&mut self, id: SpeakerId, color: Rgba) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) {
            entry.color = color;
        }
    }

    /// Tokens for one render pass. Unnamed speakers are left out.
    pub fn tokens<'a>(&'a self, ctx: &'a RenderContext) -> Vec<SpeakerToken<'a>> {
        self.entries
            .iter()
            .map(|entry| SpeakerToken::new(self.display_name(entry.id, ctx), entry.color))
            .filter(|token| !token.display_name.is_empty())
            .collect()
    }
}
