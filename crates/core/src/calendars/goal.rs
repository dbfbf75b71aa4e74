use chrono::NaiveDateTime;
use daymark_protocol::{
    DrawCommand, Fill, FontWeight, Point, Rect, StatsRecord, TextAnchor, TextBaseline, Theme,
};

use super::{CalendarOutput, centered_text};
use crate::clock::{self, DateFormat};
use crate::device::CanvasSpec;
use crate::format;

pub const DEFAULT_GOAL_TITLE: &str = "Goal";

const SIDE_PADDING: f64 = 0.1;
const BAR_HEIGHT: f64 = 0.025;

#[derive(Debug, Clone, PartialEq)]
pub struct GoalParams {
    pub target: NaiveDateTime,
    pub title: String,
    /// Defaults to January 1 of the current year.
    pub start: Option<NaiveDateTime>,
    pub date_format: DateFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalStats {
    pub total_days: i64,
    pub days_elapsed: i64,
    pub days_remaining: i64,
    /// Always within `[0, 1]`.
    pub progress: f64,
    pub progress_percent: String,
    pub is_complete: bool,
    pub target_date: String,
}

impl From<&GoalStats> for StatsRecord {
    fn from(s: &GoalStats) -> Self {
        StatsRecord::new()
            .with("totalDays", s.total_days)
            .with("daysElapsed", s.days_elapsed)
            .with("daysRemaining", s.days_remaining)
            .with("progress", s.progress)
            .with("progressPercent", s.progress_percent.as_str())
            .with("isComplete", s.is_complete)
            .with("targetDate", s.target_date.as_str())
    }
}

/// A target at or before the start counts as already complete.
pub fn goal_stats(params: &GoalParams, now: NaiveDateTime) -> GoalStats {
    let start = params.start.unwrap_or_else(|| clock::start_of_year(now));
    let total_days = clock::day_span(start, params.target);
    let days_elapsed = clock::day_span(start, now);
    let days_remaining = clock::day_span(now, params.target).max(0);
    let progress = if total_days <= 0 {
        1.0
    } else {
        (days_elapsed as f64 / total_days as f64).clamp(0.0, 1.0)
    };
    GoalStats {
        total_days,
        days_elapsed,
        days_remaining,
        progress,
        progress_percent: format::percent(progress),
        is_complete: days_remaining <= 0,
        target_date: clock::format_date(params.target.date(), DateFormat::Iso),
    }
}

#[tracing::instrument(level = "debug", skip(theme))]
pub fn render_goal(
    canvas: &CanvasSpec,
    theme: &Theme,
    params: &GoalParams,
    now: NaiveDateTime,
) -> CalendarOutput<GoalStats> {
    let stats = goal_stats(params, now);
    let width = canvas.width();
    let height = canvas.height();
    let center_x = width / 2.0;
    let center_y = canvas.safe_top_px() + canvas.available_height() / 2.0;

    let mut commands = Vec::with_capacity(8);

    commands.push(DrawCommand::Text {
        position: Point::new(center_x, center_y - height * 0.08),
        text: stats.days_remaining.to_string(),
        font_size_fraction: 0.25,
        weight: FontWeight::Bold,
        color: theme.foreground,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Middle,
    });
    commands.push(centered_text(
        center_x,
        center_y + height * 0.02,
        format!(
            "{} remaining",
            format::plural(stats.days_remaining, "day", "days")
        ),
        0.05,
        FontWeight::Regular,
        theme.secondary_text,
    ));

    let bar_x = width * SIDE_PADDING;
    let bar_w = width - bar_x * 2.0;
    let bar_h = width * BAR_HEIGHT;
    let bar_y = center_y + height * 0.08;
    let radius = bar_h / 2.0;

    commands.push(DrawCommand::Rect {
        rect: Rect::new(bar_x, bar_y, bar_w, bar_h),
        corner_radius: radius,
        fill: Fill::solid(theme.muted),
        glow: None,
    });
    let filled_w = bar_w * stats.progress;
    if filled_w > 0.0 {
        commands.push(DrawCommand::Rect {
            rect: Rect::new(bar_x, bar_y, filled_w, bar_h),
            corner_radius: radius,
            fill: Fill::LinearGradient {
                from: theme.accent,
                to: theme.foreground,
                x_from: bar_x,
                x_to: bar_x + bar_w,
            },
            glow: None,
        });
    }

    commands.push(centered_text(
        center_x,
        bar_y + height * 0.07,
        params.title.as_str(),
        0.045,
        FontWeight::Bold,
        theme.foreground,
    ));
    commands.push(centered_text(
        center_x,
        bar_y + height * 0.10,
        clock::format_date(params.target.date(), params.date_format),
        0.032,
        FontWeight::Regular,
        theme.secondary_text,
    ));
    commands.push(centered_text(
        center_x,
        bar_y + height * 0.13,
        format!("{}% complete", stats.progress_percent),
        0.032,
        FontWeight::Regular,
        theme.secondary_text,
    ));

    CalendarOutput { commands, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device;
    use chrono::{Duration, NaiveDate};

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, 0, 0))
            .unwrap_or_default()
    }

    fn params(target: NaiveDateTime, start: Option<NaiveDateTime>) -> GoalParams {
        GoalParams {
            target,
            title: DEFAULT_GOAL_TITLE.to_string(),
            start,
            date_format: DateFormat::LongEnUs,
        }
    }

    fn texts(cmds: &[DrawCommand]) -> Vec<&str> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn target_equal_to_start_is_complete() {
        let start = at(2025, 6, 1, 0);
        let s = goal_stats(&params(start, Some(start)), at(2025, 3, 1, 12));
        assert!(s.total_days <= 0);
        assert!((s.progress - 1.0).abs() < f64::EPSILON);
        assert_eq!(s.progress_percent, "100.0");
    }

    #[test]
    fn target_before_start_never_produces_nan() {
        let s = goal_stats(
            &params(at(2025, 1, 1, 0), Some(at(2025, 6, 1, 0))),
            at(2025, 3, 1, 0),
        );
        assert!(s.progress.is_finite());
        assert_eq!(s.progress_percent, "100.0");
    }

    #[test]
    fn progress_strictly_inside_mid_goal() {
        let now = at(2025, 3, 1, 0);
        let s = goal_stats(
            &params(now + Duration::days(1), Some(now - Duration::days(10))),
            now,
        );
        assert_eq!(s.total_days, 11);
        assert_eq!(s.days_elapsed, 10);
        assert_eq!(s.days_remaining, 1);
        assert!(s.progress > 0.0 && s.progress < 1.0);
        assert!(!s.is_complete);
    }

    #[test]
    fn start_defaults_to_january_first() {
        let now = at(2025, 1, 11, 0);
        let s = goal_stats(&params(at(2025, 1, 21, 0), None), now);
        assert_eq!(s.total_days, 20);
        assert_eq!(s.days_elapsed, 10);
        assert_eq!(s.progress_percent, "50.0");
    }

    #[test]
    fn past_target_clamps_remaining() {
        let s = goal_stats(&params(at(2025, 1, 5, 0), None), at(2025, 3, 1, 0));
        assert_eq!(s.days_remaining, 0);
        assert!(s.is_complete);
        assert_eq!(s.progress_percent, "100.0");
        assert_eq!(s.target_date, "2025-01-05");
    }

    #[test]
    fn start_after_now_clamps_to_zero_progress() {
        let now = at(2025, 3, 1, 0);
        let s = goal_stats(
            &params(at(2025, 12, 1, 0), Some(at(2025, 6, 1, 0))),
            now,
        );
        assert!(s.days_elapsed < 0);
        assert!(s.progress.abs() < f64::EPSILON);
    }

    #[test]
    fn layout_and_labels() {
        let canvas = device::resolve(None, Some(1000), Some(2000));
        let theme = Theme::default();
        let now = at(2025, 12, 30, 0);
        let out = render_goal(&canvas, &theme, &params(at(2025, 12, 31, 0), None), now);
        assert_eq!(
            texts(&out.commands),
            vec![
                "1",
                "day remaining",
                "Goal",
                "December 31, 2025",
                &format!("{}% complete", out.stats.progress_percent),
            ]
        );

        let bars: Vec<_> = out
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect {
                    rect,
                    corner_radius,
                    fill,
                    ..
                } => Some((*rect, *corner_radius, *fill)),
                _ => None,
            })
            .collect();
        assert_eq!(bars.len(), 2);
        let (track, radius, _) = bars[0];
        assert!((track.x - 100.0).abs() < 1e-9);
        assert!((track.w - 800.0).abs() < 1e-9);
        assert!((track.h - 25.0).abs() < 1e-9);
        assert!((radius - 12.5).abs() < 1e-9);
        let (fill_rect, _, fill) = bars[1];
        assert!((fill_rect.w - 800.0 * out.stats.progress).abs() < 1e-9);
        assert!(matches!(
            fill,
            Fill::LinearGradient { from, to, x_from, x_to }
                if from == theme.accent && to == theme.foreground && (x_to - x_from - 800.0).abs() < 1e-9
        ));
    }

    #[test]
    fn no_fill_bar_at_zero_progress() {
        let canvas = device::resolve(None, None, None);
        let now = at(2025, 3, 1, 0);
        let out = render_goal(
            &canvas,
            &Theme::default(),
            &params(at(2025, 12, 1, 0), Some(now)),
            now,
        );
        let rects = out
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { .. }))
            .count();
        assert_eq!(rects, 1);
        assert_eq!(texts(&out.commands)[1], "days remaining");
    }
}
