//! Preview palette.
//!
//! Colors are written as `#rrggbb` strings in JSON; any color left out of a
//! palette file keeps its default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use preview_common::{PreviewError, PreviewResult};

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        hex_to_rgb(&value).ok_or_else(|| format!("invalid color '{}', expected #rrggbb", value))
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some(Rgb::new(r, g, b))
}

/// Colors used for every preview element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: Rgb,
    pub landuse: Rgb,
    pub water: Rgb,
    pub road: Rgb,
    pub point_fill: Rgb,
    pub point_outline: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb::new(0xFF, 0xFC, 0xF9),
            landuse: Rgb::new(0xDD, 0xF6, 0xDE),
            water: Rgb::new(0xC7, 0xDE, 0xF5),
            road: Rgb::new(0xC0, 0xE0, 0xE0),
            point_fill: Rgb::new(0x74, 0xA5, 0x78),
            point_outline: Rgb::BLACK,
        }
    }
}

impl Palette {
    /// Load a palette from a JSON string
    pub fn from_json(json_str: &str) -> PreviewResult<Self> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Load a palette from a JSON file
    pub fn from_file(path: &Path) -> PreviewResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
