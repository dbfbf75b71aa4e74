use chrono::NaiveDateTime;
use daymark_protocol::{DrawCommand, Fill, FontWeight, Glow, Rect, StatsRecord, Theme};

use super::{CalendarOutput, centered_text};
use crate::clock;
use crate::device::CanvasSpec;
use crate::format;
use crate::grid::{CellState, GlyphPolicy, GridBand, GridLayout, paint_grid};

pub const WEEKS_PER_ROW: usize = 52;
pub const DEFAULT_LIFE_EXPECTANCY: u32 = 80;
pub const MAX_LIFE_EXPECTANCY: u32 = 150;

const BAND: GridBand = GridBand {
    padding_fraction: 0.05,
    height_fraction: 0.7,
    vertical_divisor: 2.5,
};
const BLOCK_FRACTION: f64 = 0.85;
const CURRENT_GLOW: Glow = Glow::Shadow { blur: 10.0 };

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifeParams {
    pub birth: NaiveDateTime,
    pub life_expectancy_years: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LifeStats {
    pub age_years: i64,
    pub weeks_lived: i64,
    pub weeks_remaining: i64,
    pub total_weeks: i64,
    pub progress_percent: String,
    pub life_expectancy: u32,
    /// Index of the highlighted week, or `None` once the whole grid is lived.
    pub current_week: Option<usize>,
}

impl From<&LifeStats> for StatsRecord {
    fn from(s: &LifeStats) -> Self {
        StatsRecord::new()
            .with("ageYears", s.age_years)
            .with("weeksLived", s.weeks_lived)
            .with("weeksRemaining", s.weeks_remaining)
            .with("totalWeeks", s.total_weeks)
            .with("progressPercent", s.progress_percent.as_str())
            .with("lifeExpectancy", s.life_expectancy)
    }
}

/// A birth date in the future counts as zero weeks and zero years lived.
pub fn life_stats(params: &LifeParams, now: NaiveDateTime) -> LifeStats {
    let total_weeks = WEEKS_PER_ROW as i64 * i64::from(params.life_expectancy_years);
    let weeks_lived = clock::weeks_since(params.birth, now).max(0);
    let progress = if total_weeks > 0 {
        (weeks_lived as f64 / total_weeks as f64).clamp(0.0, 1.0)
    } else {
        1.0
    };
    LifeStats {
        age_years: clock::age_years(params.birth, now).max(0),
        weeks_lived,
        weeks_remaining: (total_weeks - weeks_lived).max(0),
        total_weeks,
        progress_percent: format::percent(progress),
        life_expectancy: params.life_expectancy_years,
        current_week: (weeks_lived < total_weeks).then_some(weeks_lived as usize),
    }
}

/// One block per week. Every cell is filled, so future weeks get their own
/// "empty" shade rather than an outline.
struct WeekBlock<'a> {
    theme: &'a Theme,
}

impl GlyphPolicy for WeekBlock<'_> {
    fn glyph(&self, cell: Rect, state: CellState) -> DrawCommand {
        let (color, glow) = match state {
            CellState::Past => (self.theme.foreground, None),
            CellState::Current => (self.theme.accent, Some(CURRENT_GLOW)),
            CellState::Future => (self.theme.empty, None),
        };
        DrawCommand::Rect {
            rect: Rect::new(cell.x, cell.y, cell.w * BLOCK_FRACTION, cell.h * BLOCK_FRACTION),
            corner_radius: 0.0,
            fill: Fill::solid(color),
            glow,
        }
    }
}

#[tracing::instrument(level = "debug", skip(theme))]
pub fn render_life(
    canvas: &CanvasSpec,
    theme: &Theme,
    params: &LifeParams,
    now: NaiveDateTime,
) -> CalendarOutput<LifeStats> {
    let stats = life_stats(params, now);
    let rows = params.life_expectancy_years as usize;
    let layout = GridLayout::new(canvas, WEEKS_PER_ROW, rows, BAND);

    let mut commands = paint_grid(
        &layout,
        WEEKS_PER_ROW * rows,
        stats.current_week,
        &WeekBlock { theme },
    );

    let center_x = canvas.width() / 2.0;
    let label_y = layout.origin_y + layout.band_height() + canvas.height() * 0.05;
    commands.push(centered_text(
        center_x,
        label_y,
        format!("{} years lived", stats.age_years),
        0.055,
        FontWeight::Bold,
        theme.foreground,
    ));
    commands.push(centered_text(
        center_x,
        label_y + canvas.height() * 0.04,
        format!("{} weeks remain", format::thousands(stats.weeks_remaining)),
        0.032,
        FontWeight::Regular,
        theme.secondary_text,
    ));
    commands.push(centered_text(
        center_x,
        label_y + canvas.height() * 0.07,
        format!(
            "{}% of {} years",
            stats.progress_percent, params.life_expectancy_years
        ),
        0.032,
        FontWeight::Regular,
        theme.secondary_text,
    ));

    CalendarOutput { commands, stats }
}
