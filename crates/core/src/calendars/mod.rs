//! The three wallpaper calendars.
//!
//! Each calendar exposes a stats function (pure date math, usable without
//! drawing anything) and a render function that lays out draw commands for
//! a canvas. Year and life share [`crate::grid`]; goal is a single-metric
//! layout.

pub mod goal;
pub mod life;
pub mod year;

use daymark_protocol::{Color, DrawCommand, FontWeight, Point, TextAnchor, TextBaseline};

pub use goal::{GoalParams, GoalStats, goal_stats, render_goal};
pub use life::{LifeParams, LifeStats, life_stats, render_life};
pub use year::{YearStats, render_year, year_stats};

/// Draw commands plus the typed stats they were derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarOutput<S> {
    pub commands: Vec<DrawCommand>,
    pub stats: S,
}

/// Horizontally centered label.
pub(crate) fn centered_text(
    x: f64,
    y: f64,
    text: impl Into<String>,
    font_size_fraction: f64,
    weight: FontWeight,
    color: Color,
) -> DrawCommand {
    DrawCommand::Text {
        position: Point::new(x, y),
        text: text.into(),
        font_size_fraction,
        weight,
        color,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Alphabetic,
    }
}
