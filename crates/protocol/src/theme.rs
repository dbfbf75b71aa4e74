use serde::{Deserialize, Serialize};

use crate::types::Color;

pub const DEFAULT_FONT_FAMILY: &str =
    "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif";

/// Colors and typography shared by every renderer.
///
/// Passed explicitly into each render call; there is no global palette.
/// Every field has a default, so a theme file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    pub background: Color,
    /// Past glyphs and primary text.
    pub foreground: Color,
    /// Outline of future day dots and the empty progress bar track.
    pub muted: Color,
    /// Fill of future week blocks in the life grid.
    pub empty: Color,
    pub secondary_text: Color,
    /// Highlight for the current day/week and the progress sweep.
    pub accent: Color,
    pub font_family: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            foreground: Color::WHITE,
            muted: Color::rgb(0x33, 0x33, 0x33),
            empty: Color::rgb(0x22, 0x22, 0x22),
            secondary_text: Color::rgb(0x88, 0x88, 0x88),
            accent: Color::rgb(0xff, 0x6b, 0x6b),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl Theme {
    pub fn with_accent(mut self, accent: Color) -> Self {
        self.accent = accent;
        self
    }
}
