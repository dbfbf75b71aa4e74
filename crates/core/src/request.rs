//! Orchestration: one request in, one finished wallpaper out.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use daymark_protocol::{DrawCommand, Scene, StatsRecord, Theme};

use crate::calendars::life::MAX_LIFE_EXPECTANCY;
use crate::calendars::{self, GoalParams, LifeParams};
use crate::clock::Clock;
use crate::device::CanvasSpec;
use crate::error::{RenderError, RenderResult};
use crate::svg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CalendarKind {
    #[default]
    Year,
    Life,
    Goal,
}

impl CalendarKind {
    pub const ALL: [CalendarKind; 3] = [CalendarKind::Year, CalendarKind::Life, CalendarKind::Goal];

    pub fn as_str(self) -> &'static str {
        match self {
            CalendarKind::Year => "year",
            CalendarKind::Life => "life",
            CalendarKind::Goal => "goal",
        }
    }
}

impl fmt::Display for CalendarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalendarKind {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalendarKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                RenderError::invalid_parameter("type", format!("expected year, life or goal, got {s:?}"))
            })
    }
}

/// Per-calendar inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum CalendarRequest {
    Year,
    Life(LifeParams),
    Goal(GoalParams),
}

impl CalendarRequest {
    pub fn kind(&self) -> CalendarKind {
        match self {
            CalendarRequest::Year => CalendarKind::Year,
            CalendarRequest::Life(_) => CalendarKind::Life,
            CalendarRequest::Goal(_) => CalendarKind::Goal,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub canvas: CanvasSpec,
    pub theme: Theme,
    pub calendar: CalendarRequest,
}

impl RenderRequest {
    pub fn new(canvas: CanvasSpec, theme: Theme, calendar: CalendarRequest) -> Self {
        Self {
            canvas,
            theme,
            calendar,
        }
    }

    pub fn kind(&self) -> CalendarKind {
        self.calendar.kind()
    }

    /// Reject inputs that no renderer can lay out.
    pub fn validate(&self) -> RenderResult<()> {
        let c = &self.canvas;
        CanvasSpec::new(c.width_px, c.height_px, c.safe_area_top, c.safe_area_bottom)?;
        if let CalendarRequest::Life(life) = &self.calendar
            && !(1..=MAX_LIFE_EXPECTANCY).contains(&life.life_expectancy_years)
        {
            return Err(RenderError::invalid_parameter(
                "expectancy",
                format!(
                    "must be between 1 and {MAX_LIFE_EXPECTANCY}, got {}",
                    life.life_expectancy_years
                ),
            ));
        }
        Ok(())
    }
}

/// A rendered wallpaper: the scene to paint and the stats it shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Wallpaper {
    pub kind: CalendarKind,
    pub scene: Scene,
    pub stats: StatsRecord,
}

impl Wallpaper {
    pub fn to_svg(&self) -> String {
        svg::render_svg(&self.scene)
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.scene.commands
    }
}

/// Render `request` as of `now`. Either the whole wallpaper is produced or
/// an error is returned; there is no partial output.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(kind = %request.kind(), width = request.canvas.width_px, height = request.canvas.height_px)
)]
pub fn render(request: &RenderRequest, now: NaiveDateTime) -> RenderResult<Wallpaper> {
    request.validate()?;
    let canvas = &request.canvas;
    let theme = &request.theme;

    let (commands, stats) = match &request.calendar {
        CalendarRequest::Year => {
            let out = calendars::render_year(canvas, theme, now);
            (out.commands, StatsRecord::from(&out.stats))
        }
        CalendarRequest::Life(params) => {
            let out = calendars::render_life(canvas, theme, params, now);
            (out.commands, StatsRecord::from(&out.stats))
        }
        CalendarRequest::Goal(params) => {
            let out = calendars::render_goal(canvas, theme, params, now);
            (out.commands, StatsRecord::from(&out.stats))
        }
    };
    tracing::debug!(commands = commands.len(), "wallpaper laid out");

    Ok(Wallpaper {
        kind: request.kind(),
        scene: Scene {
            width: canvas.width_px,
            height: canvas.height_px,
            background: theme.background,
            font_family: theme.font_family.clone(),
            commands,
        },
        stats,
    })
}

/// Read the clock once, then render.
pub fn render_with_clock(request: &RenderRequest, clock: &impl Clock) -> RenderResult<Wallpaper> {
    render(request, clock.now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{DateFormat, FixedClock};
    use crate::device;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap_or_default()
    }

    fn life(expectancy: u32) -> CalendarRequest {
        CalendarRequest::Life(LifeParams {
            birth: NaiveDate::from_ymd_opt(1990, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
            life_expectancy_years: expectancy,
        })
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("LIFE".parse::<CalendarKind>().ok(), Some(CalendarKind::Life));
        assert_eq!(" goal ".parse::<CalendarKind>().ok(), Some(CalendarKind::Goal));
        assert!(matches!(
            "decade".parse::<CalendarKind>(),
            Err(RenderError::InvalidParameter { name: "type", .. })
        ));
        assert_eq!(CalendarKind::default().to_string(), "year");
    }

    #[test]
    fn scene_carries_canvas_and_theme() {
        let request = RenderRequest::new(
            device::resolve(Some("iphonese"), None, None),
            Theme::default(),
            CalendarRequest::Year,
        );
        let wallpaper = render(&request, now()).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!((wallpaper.scene.width, wallpaper.scene.height), (750, 1334));
        assert_eq!(wallpaper.scene.background, request.theme.background);
        assert_eq!(wallpaper.kind, CalendarKind::Year);
        assert_eq!(wallpaper.stats.get_int("currentDay"), Some(60));
    }

    #[test]
    fn expectancy_out_of_range_is_rejected() {
        let canvas = device::resolve(None, None, None);
        for bad in [0, MAX_LIFE_EXPECTANCY + 1] {
            let request = RenderRequest::new(canvas, Theme::default(), life(bad));
            assert!(matches!(
                render(&request, now()),
                Err(RenderError::InvalidParameter { name: "expectancy", .. })
            ));
        }
        let ok = RenderRequest::new(canvas, Theme::default(), life(MAX_LIFE_EXPECTANCY));
        assert!(render(&ok, now()).is_ok());
    }

    #[test]
    fn hand_built_zero_canvas_is_rejected() {
        let mut canvas = device::resolve(None, None, None);
        canvas.width_px = 0;
        let request = RenderRequest::new(canvas, Theme::default(), CalendarRequest::Year);
        assert!(matches!(render(&request, now()), Err(RenderError::InvalidCanvas(_))));
    }

    #[test]
    fn clock_is_read_once_per_render() {
        let request = RenderRequest::new(
            device::resolve(None, None, None),
            Theme::default(),
            CalendarRequest::Goal(GoalParams {
                target: now() + chrono::Duration::days(30),
                title: "Launch".into(),
                start: None,
                date_format: DateFormat::LongEnUs,
            }),
        );
        let clock = FixedClock(now());
        let a = render_with_clock(&request, &clock).ok();
        let b = render_with_clock(&request, &clock).ok();
        assert!(a.is_some());
        assert_eq!(a, b);
    }
}
