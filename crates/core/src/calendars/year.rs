use chrono::{Datelike, NaiveDateTime};
use daymark_protocol::{
    CircleStyle, DrawCommand, FontWeight, Glow, Rect, StatsRecord, Theme,
};

use super::{CalendarOutput, centered_text};
use crate::clock;
use crate::device::CanvasSpec;
use crate::format;
use crate::grid::{CellState, GlyphPolicy, GridBand, GridLayout, paint_grid};

const COLUMNS: usize = 20;
const BAND: GridBand = GridBand {
    padding_fraction: 0.08,
    height_fraction: 0.6,
    vertical_divisor: 2.0,
};
const DOT_RADIUS_FRACTION: f64 = 0.35;
const OUTLINE_WIDTH: f64 = 2.0;
const HALO: Glow = Glow::Halo {
    radius_scale: 2.0,
    opacity: 0.3,
};

#[derive(Debug, Clone, PartialEq)]
pub struct YearStats {
    pub year: i32,
    pub total_days: u32,
    pub current_day: u32,
    pub remaining_days: u32,
    pub progress_percent: String,
}

impl From<&YearStats> for StatsRecord {
    fn from(s: &YearStats) -> Self {
        StatsRecord::new()
            .with("year", s.year)
            .with("totalDays", s.total_days)
            .with("currentDay", s.current_day)
            .with("remainingDays", s.remaining_days)
            .with("progressPercent", s.progress_percent.as_str())
    }
}

pub fn year_stats(now: NaiveDateTime) -> YearStats {
    let year = now.year();
    let total_days = clock::days_in_year(year);
    let current_day = clock::day_of_year(now);
    YearStats {
        year,
        total_days,
        current_day,
        remaining_days: total_days.saturating_sub(current_day),
        progress_percent: format::percent(f64::from(current_day) / f64::from(total_days)),
    }
}

/// One dot per day: solid for elapsed days, accent with a halo for today,
/// outline for days still ahead.
struct DayDot<'a> {
    theme: &'a Theme,
    radius: f64,
}

impl GlyphPolicy for DayDot<'_> {
    fn glyph(&self, cell: Rect, state: CellState) -> DrawCommand {
        let (style, color, glow) = match state {
            CellState::Past => (CircleStyle::Fill, self.theme.foreground, None),
            CellState::Current => (CircleStyle::Fill, self.theme.accent, Some(HALO)),
            CellState::Future => (
                CircleStyle::Stroke {
                    width: OUTLINE_WIDTH,
                },
                self.theme.muted,
                None,
            ),
        };
        DrawCommand::Circle {
            center: cell.center(),
            radius: self.radius,
            style,
            color,
            glow,
        }
    }
}

#[tracing::instrument(level = "debug", skip(theme))]
pub fn render_year(
    canvas: &CanvasSpec,
    theme: &Theme,
    now: NaiveDateTime,
) -> CalendarOutput<YearStats> {
    let stats = year_stats(now);
    let total = stats.total_days as usize;
    let layout = GridLayout::for_items(canvas, total, COLUMNS, BAND);
    let policy = DayDot {
        theme,
        radius: layout.spacing_x.min(layout.spacing_y) * DOT_RADIUS_FRACTION,
    };
    let current = (stats.current_day as usize).checked_sub(1);

    let mut commands = paint_grid(&layout, total, current, &policy);

    let center_x = canvas.width() / 2.0;
    let first_row_y = layout.origin_y + layout.spacing_y / 2.0;
    let below_grid = first_row_y + layout.band_height();
    commands.push(centered_text(
        center_x,
        below_grid + canvas.height() * 0.08,
        stats.year.to_string(),
        0.06,
        FontWeight::Bold,
        theme.foreground,
    ));
    commands.push(centered_text(
        center_x,
        below_grid + canvas.height() * 0.12,
        format!("{}% of {} complete", stats.progress_percent, stats.year),
        0.035,
        FontWeight::Regular,
        theme.secondary_text,
    ));

    CalendarOutput { commands, stats }
}
