//! The on-demand image endpoint, as a pure function an HTTP layer can call.
//!
//! Query parameters:
//!
//! | key | meaning | default |
//! |---|---|---|
//! | `type` | `year`, `life` or `goal` | `year` |
//! | `accent` | hex color, `#` optional | theme accent (`ff6b6b`) |
//! | `device` | preset id | `iphone15pro` |
//! | `width`, `height` | pixel override, both required, leading integer read | preset size |
//! | `birth`, `expectancy` | life only | `1990-01-01`, `80` |
//! | `target`, `title` | goal only | Dec 31 this year, `Goal` |

use chrono::NaiveDateTime;
use daymark_protocol::{Color, Theme};
use url::form_urlencoded;

use crate::calendars::goal::DEFAULT_GOAL_TITLE;
use crate::calendars::life::DEFAULT_LIFE_EXPECTANCY;
use crate::calendars::{GoalParams, LifeParams};
use crate::clock::{self, DateFormat};
use crate::device;
use crate::error::RenderResult;
use crate::request::{self, CalendarKind, CalendarRequest, RenderRequest};

pub const DEFAULT_BIRTH_DATE: &str = "1990-01-01";
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";
pub const CACHE_CONTROL: &str = "s-maxage=3600, stale-while-revalidate";
pub const ERROR_BODY: &str = "Error rendering wallpaper";

/// Raw endpoint parameters. Empty values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WallpaperQuery {
    pub kind: Option<String>,
    pub accent: Option<String>,
    pub device: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub birth: Option<String>,
    pub expectancy: Option<String>,
    pub target: Option<String>,
    pub title: Option<String>,
}

impl WallpaperQuery {
    /// Parse an `application/x-www-form-urlencoded` query string, with or
    /// without its leading `?`. Unknown keys are ignored; for repeated keys
    /// the last one wins.
    pub fn parse(query: &str) -> Self {
        let mut q = WallpaperQuery::default();
        let query = query.strip_prefix('?').unwrap_or(query);
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "type" => &mut q.kind,
                "accent" => &mut q.accent,
                "device" => &mut q.device,
                "width" => &mut q.width,
                "height" => &mut q.height,
                "birth" => &mut q.birth,
                "expectancy" => &mut q.expectancy,
                "target" => &mut q.target,
                "title" => &mut q.title,
                _ => continue,
            };
            *slot = Some(value.to_string());
        }
        q
    }

    /// Resolve defaults and build a render request.
    ///
    /// Unknown devices, unknown calendar types, bad accents and bad numbers
    /// fall back to defaults. Unparseable dates are errors.
    pub fn to_request(&self, now: NaiveDateTime, theme: &Theme) -> RenderResult<RenderRequest> {
        let canvas = device::resolve(
            self.device.as_deref(),
            positive(self.width.as_deref()),
            positive(self.height.as_deref()),
        );

        let mut theme = theme.clone();
        if let Some(raw) = self.accent.as_deref() {
            match Color::from_hex(raw) {
                Some(accent) => theme = theme.with_accent(accent),
                None => tracing::warn!(accent = raw, "invalid accent color, using theme accent"),
            }
        }

        let kind = match self.kind.as_deref() {
            None => CalendarKind::Year,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(kind = raw, "unknown calendar type, rendering year");
                CalendarKind::Year
            }),
        };

        let calendar = match kind {
            CalendarKind::Year => CalendarRequest::Year,
            CalendarKind::Life => CalendarRequest::Life(LifeParams {
                birth: clock::parse_date(
                    "birth",
                    self.birth.as_deref().unwrap_or(DEFAULT_BIRTH_DATE),
                )?,
                life_expectancy_years: positive(self.expectancy.as_deref())
                    .unwrap_or(DEFAULT_LIFE_EXPECTANCY),
            }),
            CalendarKind::Goal => CalendarRequest::Goal(GoalParams {
                target: match self.target.as_deref() {
                    Some(raw) => clock::parse_date("target", raw)?,
                    None => clock::midnight(clock::last_day_of_year(now)),
                },
                title: self
                    .title
                    .clone()
                    .unwrap_or_else(|| DEFAULT_GOAL_TITLE.to_string()),
                start: None,
                date_format: DateFormat::LongEnUs,
            }),
        };

        Ok(RenderRequest::new(canvas, theme, calendar))
    }
}

/// Leading decimal integer of `raw`, if it is greater than zero.
///
/// Reads like `parseInt`: leading whitespace and a `+` are skipped, and
/// parsing stops at the first non-digit, so `1179.5` is 1179 and `80y` is 80.
fn positive(raw: Option<&str>) -> Option<u32> {
    let s = raw?.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse::<u32>().ok().filter(|n| *n > 0)
}

/// What the HTTP layer should send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub cache_control: Option<&'static str>,
    pub body: String,
}

impl EndpointResponse {
    fn svg(body: String) -> Self {
        Self {
            status: 200,
            content_type: SVG_CONTENT_TYPE,
            cache_control: Some(CACHE_CONTROL),
            body,
        }
    }

    fn failure() -> Self {
        Self {
            status: 500,
            content_type: "text/plain",
            cache_control: None,
            body: ERROR_BODY.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Render the wallpaper described by `query` as an SVG response.
///
/// Any failure becomes a 500 with a plain-text body; no partial image is
/// ever returned.
pub fn handle_render_query(query: &str, now: NaiveDateTime, theme: &Theme) -> EndpointResponse {
    let parsed = WallpaperQuery::parse(query);
    let result = parsed
        .to_request(now, theme)
        .and_then(|req| request::render(&req, now));
    match result {
        Ok(wallpaper) => EndpointResponse::svg(wallpaper.to_svg()),
        Err(e) => {
            tracing::error!(error = %e, query, "failed to render wallpaper");
            EndpointResponse::failure()
        }
    }
}
