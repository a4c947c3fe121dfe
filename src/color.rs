//! RGBA colors used for speaker highlights and default text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 8-bit RGBA color. Serialized as `#rrggbb` or `#rrggbbaa`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const GOLD: Rgba = Rgba::rgb(255, 200, 40);
    pub const RED: Rgba = Rgba::rgb(220, 50, 40);
    pub const BLUE: Rgba = Rgba::rgb(70, 130, 230);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Rgba {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let hex = value
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| format!("color '{value}' must start with '#'"))?;
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return Err(format!("color '{value}' must be #rrggbb or #rrggbbaa"));
        }
        let channel = |idx: usize| {
            u8::from_str_radix(&hex[idx..idx + 2], 16)
                .map_err(|_| format!("color '{value}' has invalid hex digits"))
        };
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl TryFrom<String> for Rgba {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}
