//! Interactive preview state.
//!
//! A [`PreviewSession`] owns what the user has picked so far and the last
//! wallpaper that rendered successfully. Frontends (the browser bridge, the
//! terminal preview) mutate the state, call [`PreviewSession::refresh`], and
//! repaint whatever [`PreviewSession::wallpaper`] holds. A failed refresh
//! leaves the previous wallpaper on screen.

use chrono::{NaiveDate, NaiveDateTime};
use daymark_protocol::{Color, StatsRecord, Theme};
use serde::Serialize;

use crate::calendars::life::DEFAULT_LIFE_EXPECTANCY;
use crate::calendars::{GoalParams, LifeParams};
use crate::clock::{self, Clock, DateFormat};
use crate::device::{self, CanvasSpec};
use crate::error::RenderResult;
use crate::format;
use crate::request::{self, CalendarKind, CalendarRequest, RenderRequest, Wallpaper};
use crate::share;

/// Device picked when an interactive session starts.
pub const PREVIEW_DEVICE_ID: &str = "iphone15";
pub const PREVIEW_GOAL_TITLE: &str = "End of Year";

/// Everything the user can change in the preview.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewState {
    pub kind: CalendarKind,
    pub device_id: String,
    /// Explicit `(width, height)` in pixels, replacing the preset's size.
    pub size: Option<(u32, u32)>,
    pub accent: Color,
    pub birth: NaiveDate,
    pub life_expectancy: u32,
    pub target: NaiveDate,
    pub title: String,
}

impl PreviewState {
    /// Starting state for a session opened on `today`.
    pub fn for_date(today: NaiveDate) -> Self {
        Self {
            kind: CalendarKind::Year,
            device_id: PREVIEW_DEVICE_ID.to_string(),
            size: None,
            accent: Theme::default().accent,
            birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or(today),
            life_expectancy: DEFAULT_LIFE_EXPECTANCY,
            target: clock::last_day_of_year(clock::midnight(today)),
            title: PREVIEW_GOAL_TITLE.to_string(),
        }
    }

    /// Canvas the state renders onto: the device preset, resized when
    /// [`size`](Self::size) is set.
    pub fn canvas(&self) -> CanvasSpec {
        let (width, height) = self.size.unzip();
        device::resolve(Some(&self.device_id), width, height)
    }

    pub fn to_request(&self, theme: &Theme) -> RenderRequest {
        let calendar = match self.kind {
            CalendarKind::Year => CalendarRequest::Year,
            CalendarKind::Life => CalendarRequest::Life(LifeParams {
                birth: clock::midnight(self.birth),
                life_expectancy_years: self.life_expectancy,
            }),
            CalendarKind::Goal => CalendarRequest::Goal(GoalParams {
                target: clock::midnight(self.target),
                title: self.title.clone(),
                start: None,
                date_format: DateFormat::LongEnUs,
            }),
        };
        RenderRequest::new(
            self.canvas(),
            theme.clone().with_accent(self.accent),
            calendar,
        )
    }
}

/// One cell of the stats panel: a big value over a short label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub value: String,
    pub label: String,
}

impl SummaryLine {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Human-readable stats panel for a calendar's stats record.
pub fn summary_lines(kind: CalendarKind, stats: &StatsRecord) -> Vec<SummaryLine> {
    let value = |key: &str| stats.get(key).map(ToString::to_string).unwrap_or_default();
    let percent = format!("{}%", value("progressPercent"));
    match kind {
        CalendarKind::Year => vec![
            SummaryLine::new(value("currentDay"), "days passed"),
            SummaryLine::new(value("remainingDays"), "days remaining"),
            SummaryLine::new(percent, format!("of {}", value("year"))),
        ],
        CalendarKind::Life => vec![
            SummaryLine::new(value("ageYears"), "years lived"),
            SummaryLine::new(
                stats
                    .get_int("weeksRemaining")
                    .map(format::thousands)
                    .unwrap_or_default(),
                "weeks remaining",
            ),
            SummaryLine::new(percent, "of life"),
        ],
        CalendarKind::Goal => vec![
            SummaryLine::new(value("daysRemaining"), "days to go"),
            SummaryLine::new(percent, "complete"),
        ],
    }
}

#[derive(Debug, Clone)]
pub struct PreviewSession {
    state: PreviewState,
    theme: Theme,
    wallpaper: Option<Wallpaper>,
}

impl PreviewSession {
    pub fn new(state: PreviewState, theme: Theme) -> Self {
        Self {
            state,
            theme,
            wallpaper: None,
        }
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    /// Change the state. Takes effect on the next [`refresh`](Self::refresh).
    pub fn state_mut(&mut self) -> &mut PreviewState {
        &mut self.state
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// The last wallpaper that rendered successfully.
    pub fn wallpaper(&self) -> Option<&Wallpaper> {
        self.wallpaper.as_ref()
    }

    /// Re-render from the current state.
    ///
    /// On error the previous wallpaper is kept and the error is returned for
    /// the frontend to surface.
    pub fn refresh(&mut self, now: NaiveDateTime) -> RenderResult<&Wallpaper> {
        match request::render(&self.state.to_request(&self.theme), now) {
            Ok(wallpaper) => Ok(&*self.wallpaper.insert(wallpaper)),
            Err(e) => {
                tracing::warn!(error = %e, "preview refresh failed, keeping previous wallpaper");
                Err(e)
            }
        }
    }

    pub fn refresh_with_clock(&mut self, clock: &impl Clock) -> RenderResult<&Wallpaper> {
        self.refresh(clock.now())
    }

    pub fn summary(&self) -> Vec<SummaryLine> {
        self.wallpaper
            .as_ref()
            .map(|w| summary_lines(w.kind, &w.stats))
            .unwrap_or_default()
    }

    pub fn file_name(&self) -> String {
        share::export_file_name(self.state.kind, &self.state.device_id)
    }

    pub fn share_url(&self, base: &str) -> RenderResult<url::Url> {
        share::build_render_url(base, &self.state)
    }

    /// PNG of the wallpaper currently shown.
    #[cfg(feature = "raster")]
    pub fn export_png(&self) -> RenderResult<Vec<u8>> {
        let wallpaper = self.wallpaper.as_ref().ok_or_else(|| {
            crate::error::RenderError::Raster("nothing has been rendered yet".into())
        })?;
        crate::raster::rasterize_png(&wallpaper.scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap_or_default()
    }

    fn now() -> NaiveDateTime {
        clock::midnight(today())
    }

    #[test]
    fn initial_state() {
        let s = PreviewState::for_date(today());
        assert_eq!(s.kind, CalendarKind::Year);
        assert_eq!(s.device_id, "iphone15");
        assert_eq!(s.target, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default());
        assert_eq!(s.title, "End of Year");
        let req = s.to_request(&Theme::default());
        assert_eq!((req.canvas.width_px, req.canvas.height_px), (1170, 2532));
    }

    #[test]
    fn failed_refresh_keeps_previous_wallpaper() {
        let mut session = PreviewSession::new(PreviewState::for_date(today()), Theme::default());
        assert!(session.wallpaper().is_none());
        assert!(session.refresh(now()).is_ok());
        let before = session.wallpaper().cloned();

        session.state_mut().kind = CalendarKind::Life;
        session.state_mut().life_expectancy = 0;
        assert!(matches!(
            session.refresh(now()),
            Err(RenderError::InvalidParameter { .. })
        ));
        assert_eq!(session.wallpaper().cloned(), before);
        assert_eq!(session.wallpaper().map(|w| w.kind), Some(CalendarKind::Year));
    }

    #[test]
    fn accent_change_reaches_the_scene() {
        let mut session = PreviewSession::new(PreviewState::for_date(today()), Theme::default());
        session.state_mut().accent = Color::rgb(0x4e, 0xcd, 0xc4);
        let wallpaper = session.refresh(now()).map(Clone::clone);
        let accented = wallpaper.map(|w| {
            w.scene.commands.iter().any(|c| {
                matches!(c, daymark_protocol::DrawCommand::Circle { color, .. } if *color == Color::rgb(0x4e, 0xcd, 0xc4))
            })
        });
        assert_eq!(accented.ok(), Some(true));
    }

    #[test]
    fn year_summary() {
        let mut session = PreviewSession::new(PreviewState::for_date(today()), Theme::default());
        assert!(session.summary().is_empty());
        assert!(session.refresh(now()).is_ok());
        assert_eq!(
            session.summary(),
            vec![
                SummaryLine::new("60", "days passed"),
                SummaryLine::new("305", "days remaining"),
                SummaryLine::new("16.4%", "of 2025"),
            ]
        );
    }

    #[test]
    fn life_summary_groups_thousands() {
        let stats = StatsRecord::new()
            .with("ageYears", 35)
            .with("weeksRemaining", 2327)
            .with("progressPercent", "44.1");
        let lines = summary_lines(CalendarKind::Life, &stats);
        assert_eq!(lines[1], SummaryLine::new("2,327", "weeks remaining"));
        assert_eq!(lines[2], SummaryLine::new("44.1%", "of life"));
    }

    #[test]
    fn goal_summary_and_file_name() {
        let mut state = PreviewState::for_date(today());
        state.kind = CalendarKind::Goal;
        let mut session = PreviewSession::new(state, Theme::default());
        assert!(session.refresh(now()).is_ok());
        let summary = session.summary();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0], SummaryLine::new("305", "days to go"));
        assert_eq!(summary[1].label, "complete");
        assert_eq!(session.file_name(), "goal-calendar-iphone15.png");
    }
}
