//! Integration test: drive requests through render, the SVG translator, the
//! painter translator and the image endpoint with a frozen clock.

use chrono::{NaiveDate, NaiveDateTime};
use daymark_core::paint::{PaintCall, RecordingPainter, paint_scene};
use daymark_core::{
    CalendarKind, CalendarRequest, Clock, FixedClock, RenderRequest, Theme, calendars, clock,
    device, handle_render_query, render, render_with_clock,
};
use daymark_protocol::{CircleStyle, DrawCommand, Glow};

fn frozen(y: i32, m: u32, d: u32) -> FixedClock {
    FixedClock(
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(10, 15, 0))
            .expect("valid test date"),
    )
}

fn year_request() -> RenderRequest {
    RenderRequest::new(
        device::resolve(None, None, None),
        Theme::default(),
        CalendarRequest::Year,
    )
}

fn glyph_count(commands: &[DrawCommand]) -> usize {
    commands
        .iter()
        .filter(|c| !matches!(c, DrawCommand::Text { .. }))
        .count()
}

#[test]
fn year_wallpaper_matches_known_day() {
    let wallpaper =
        render_with_clock(&year_request(), &frozen(2025, 3, 1)).expect("year renders");
    assert_eq!(wallpaper.kind, CalendarKind::Year);
    assert_eq!(wallpaper.stats.get_int("totalDays"), Some(365));
    assert_eq!(wallpaper.stats.get_int("currentDay"), Some(60));
    assert_eq!(wallpaper.stats.get_text("progressPercent"), Some("16.4"));
    assert_eq!(glyph_count(wallpaper.commands()), 365);

    let json = serde_json::to_string(&wallpaper.stats).expect("stats serialise");
    assert!(json.starts_with(r#"{"year":2025,"totalDays":365,"currentDay":60"#));
}

#[test]
fn glyph_count_ignores_canvas_and_accent() {
    let clock = frozen(2024, 7, 4);
    for (device_id, accent) in [("iphonese", "00ff00"), ("iphone16promax", "#123456")] {
        let mut request = year_request();
        request.canvas = device::resolve(Some(device_id), None, None);
        request.theme = request
            .theme
            .with_accent(daymark_protocol::Color::from_hex(accent).expect("valid hex"));
        let wallpaper = render_with_clock(&request, &clock).expect("year renders");
        assert_eq!(glyph_count(wallpaper.commands()), 366, "{device_id}");
    }
}

#[test]
fn identical_inputs_give_identical_output() {
    let clock = frozen(2025, 8, 17);
    let a = render(&year_request(), clock.now()).expect("first render");
    let b = render(&year_request(), clock.now()).expect("second render");
    assert_eq!(a, b);
    assert_eq!(a.to_svg(), b.to_svg());
}

#[test]
fn year_progress_never_decreases() {
    let start = clock::midnight(NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"));
    let mut last = 0.0_f64;
    for offset in 0..365 {
        let now = start + chrono::Duration::days(offset) + chrono::Duration::hours(13);
        let pct: f64 = calendars::year_stats(now)
            .progress_percent
            .parse()
            .expect("numeric percent");
        assert!(pct >= last, "day {offset}: {pct} < {last}");
        last = pct;
    }
    assert!((last - 100.0).abs() < f64::EPSILON);
}

#[test]
fn life_at_exact_boundary_has_no_current_marker() {
    let birth: NaiveDateTime =
        clock::midnight(NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date"));
    let request = RenderRequest::new(
        device::resolve(None, None, None),
        Theme::default(),
        CalendarRequest::Life(calendars::LifeParams {
            birth,
            life_expectancy_years: 1,
        }),
    );
    let at_boundary = birth + chrono::Duration::weeks(52);
    let wallpaper = render(&request, at_boundary).expect("life renders");
    assert_eq!(wallpaper.stats.get_int("weeksRemaining"), Some(0));
    assert_eq!(wallpaper.stats.get_text("progressPercent"), Some("100.0"));
    let glowing = wallpaper
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCommand::Rect { glow: Some(_), .. }))
        .count();
    assert_eq!(glowing, 0);

    let just_before = at_boundary - chrono::Duration::hours(1);
    let wallpaper = render(&request, just_before).expect("life renders");
    let glowing: Vec<_> = wallpaper
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCommand::Rect { glow: Some(Glow::Shadow { .. }), .. }))
        .collect();
    assert_eq!(glowing.len(), 1);
}

#[test]
fn painter_and_svg_agree_on_glyphs() {
    let wallpaper =
        render_with_clock(&year_request(), &frozen(2025, 3, 1)).expect("year renders");
    let mut painter = RecordingPainter::new();
    paint_scene(&wallpaper.scene, &mut painter);

    let outlined = painter
        .calls
        .iter()
        .filter(|c| matches!(c, PaintCall::StrokeCircle { .. }))
        .count();
    let outlined_cmds = wallpaper
        .commands()
        .iter()
        .filter(|c| {
            matches!(
                c,
                DrawCommand::Circle {
                    style: CircleStyle::Stroke { .. },
                    ..
                }
            )
        })
        .count();
    assert_eq!(outlined, 365 - 60);
    assert_eq!(outlined, outlined_cmds);

    let svg = wallpaper.to_svg();
    assert_eq!(svg.matches("<circle").count(), 365 + 1);
    assert!(svg.contains("16.4% of 2025 complete"));
}

#[test]
fn endpoint_renders_each_calendar() {
    let now = frozen(2025, 3, 1).now();
    let theme = Theme::default();
    for query in [
        "type=year&accent=ff6b6b&device=iphone15pro",
        "type=life&birth=1990-05-20&expectancy=90&width=1080&height=2340",
        "type=goal&target=2025-06-01&title=Marathon%20day",
    ] {
        let res = handle_render_query(query, now, &theme);
        assert_eq!(res.status, 200, "{query}");
        assert!(res.body.starts_with("<svg"), "{query}");
    }

    let res = handle_render_query("type=goal&target=2025-06-01&title=Marathon%20day", now, &theme);
    assert!(res.body.contains(">Marathon day<"));
    assert!(res.body.contains(">June 1, 2025<"));
    assert!(res.body.contains("linearGradient"));
}
