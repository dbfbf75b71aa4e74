use serde::{Deserialize, Serialize};

use crate::types::{Color, Point, Rect};

/// A single, stateless paint instruction.
///
/// Renderers emit a `Vec<DrawCommand>` per wallpaper. The list is the paint
/// order: later commands draw over earlier ones. Each command carries
/// concrete colors so consumers never need to resolve a palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DrawCommand {
    /// A circle, either filled or outlined. A `glow` is painted after the
    /// circle itself, so it layers over the base glyph.
    Circle {
        center: Point,
        radius: f64,
        style: CircleStyle,
        color: Color,
        glow: Option<Glow>,
    },

    /// An axis-aligned rectangle with optional rounded corners.
    Rect {
        rect: Rect,
        corner_radius: f64,
        fill: Fill,
        glow: Option<Glow>,
    },

    /// A single line of text anchored at `position`.
    ///
    /// `font_size_fraction` is relative to the scene width so the same
    /// command list scales with the canvas.
    Text {
        position: Point,
        text: String,
        font_size_fraction: f64,
        weight: FontWeight,
        color: Color,
        anchor: TextAnchor,
        baseline: TextBaseline,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CircleStyle {
    Fill,
    Stroke { width: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Fill {
    Solid { color: Color },
    /// Horizontal gradient. `x_from`/`x_to` are absolute scene coordinates,
    /// so a partially filled bar still samples the full sweep.
    LinearGradient {
        from: Color,
        to: Color,
        x_from: f64,
        x_to: f64,
    },
}

impl Fill {
    pub fn solid(color: Color) -> Self {
        Fill::Solid { color }
    }

    /// Color used by backends that cannot paint gradients.
    pub fn primary(&self) -> Color {
        match self {
            Fill::Solid { color } => *color,
            Fill::LinearGradient { from, .. } => *from,
        }
    }
}

/// Highlight drawn around the "current" glyph, in the glyph's own color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Glow {
    /// A larger translucent copy of the glyph.
    Halo { radius_scale: f64, opacity: f64 },
    /// A blurred shadow, blur radius in scene units.
    Shadow { blur: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextBaseline {
    Alphabetic,
    Middle,
}

/// A complete, backend-agnostic picture: canvas size, background, and the
/// ordered command list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    pub font_family: String,
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    /// Resolve a width-relative font size to scene units.
    pub fn font_px(&self, font_size_fraction: f64) -> f64 {
        f64::from(self.width) * font_size_fraction
    }
}
