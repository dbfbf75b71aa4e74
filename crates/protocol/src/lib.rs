pub mod commands;
pub mod stats;
pub mod theme;
pub mod types;

pub use commands::{
    CircleStyle, DrawCommand, Fill, FontWeight, Glow, Scene, TextAnchor, TextBaseline,
};
pub use stats::{StatValue, StatsRecord};
pub use theme::Theme;
pub use types::{Color, Point, Rect};
