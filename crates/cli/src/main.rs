mod renderer;

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use daymark_core::calendars::goal::DEFAULT_GOAL_TITLE;
use daymark_core::calendars::life::DEFAULT_LIFE_EXPECTANCY;
use daymark_core::calendars::{GoalParams, LifeParams};
use daymark_core::endpoint::DEFAULT_BIRTH_DATE;
use daymark_core::{
    CalendarKind, CalendarRequest, Clock, DateFormat, FixedClock, PreviewState, RenderError,
    RenderRequest, SystemClock, Theme, WallpaperQuery, clock, device, device_options,
    handle_render_query, raster, render, summary_lines,
};
use daymark_protocol::Color;

#[derive(Parser, Debug)]
#[command(name = "daymark", version, about = "Lock-screen wallpapers that count the days")]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a wallpaper to an SVG or PNG file.
    Render(RenderArgs),
    /// Print the stats for a wallpaper.
    Stats(StatsArgs),
    /// Print the image-endpoint URL for a wallpaper.
    Url(UrlArgs),
    /// Run the image endpoint on a raw query string and write the response body.
    Query(QueryArgs),
    /// List the device presets.
    Devices,
    /// Interactive terminal preview.
    Preview(CalendarArgs),
}

#[derive(Args, Debug, Clone)]
struct CalendarArgs {
    /// Calendar to draw: year, life or goal.
    #[arg(long = "type", default_value = "year")]
    kind: CalendarKind,

    /// Device preset id (see `daymark devices`).
    #[arg(long)]
    device: Option<String>,

    /// Pixel width override; needs --height too.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Pixel height override; needs --width too.
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Accent color as hex, `#` optional.
    #[arg(long)]
    accent: Option<String>,

    /// Birth date for the life calendar.
    #[arg(long, default_value = DEFAULT_BIRTH_DATE, value_parser = date_arg)]
    birth: NaiveDateTime,

    /// Life expectancy in years.
    #[arg(long, default_value_t = DEFAULT_LIFE_EXPECTANCY)]
    expectancy: u32,

    /// Goal target date. Defaults to December 31 of the current year.
    #[arg(long, value_parser = date_arg)]
    target: Option<NaiveDateTime>,

    /// Goal start date. Defaults to January 1 of the current year.
    #[arg(long, value_parser = date_arg)]
    start: Option<NaiveDateTime>,

    /// Goal title.
    #[arg(long, default_value = DEFAULT_GOAL_TITLE)]
    title: String,

    /// Spell the goal date as `YYYY-MM-DD` instead of `Month D, YYYY`.
    #[arg(long)]
    iso_dates: bool,

    /// Theme JSON file; keys it omits keep their defaults.
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Render as of this local date or datetime instead of the wall clock.
    #[arg(long, value_parser = date_arg)]
    now: Option<NaiveDateTime>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    calendar: CalendarArgs,

    /// Output path. `.png` is rasterised, anything else is written as SVG.
    /// Defaults to `{type}-calendar-{device}.png`.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct StatsArgs {
    #[command(flatten)]
    calendar: CalendarArgs,

    /// Print the raw stats record as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct UrlArgs {
    #[command(flatten)]
    calendar: CalendarArgs,

    /// Endpoint URL the query string is appended to.
    #[arg(long, default_value = "http://localhost:3000/api/render")]
    base: String,
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Query string, e.g. `type=goal&target=2025-12-31&title=Ship`.
    query: String,

    /// Write the body here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long, value_parser = date_arg)]
    now: Option<NaiveDateTime>,
}

fn date_arg(s: &str) -> Result<NaiveDateTime, RenderError> {
    clock::parse_date("date", s)
}

impl CalendarArgs {
    fn now(&self) -> NaiveDateTime {
        match self.now {
            Some(at) => FixedClock(at).now(),
            None => SystemClock.now(),
        }
    }

    fn theme(&self) -> Result<Theme> {
        let mut theme = match &self.theme {
            Some(path) => load_theme(path)?,
            None => Theme::default(),
        };
        if let Some(hex) = &self.accent {
            let accent = Color::from_hex(hex)
                .with_context(|| format!("invalid accent color {hex:?}"))?;
            theme = theme.with_accent(accent);
        }
        Ok(theme)
    }

    fn device_id(&self) -> &str {
        self.device.as_deref().unwrap_or(device::DEFAULT_DEVICE_ID)
    }

    fn request(&self, now: NaiveDateTime) -> Result<RenderRequest> {
        let canvas = device::resolve(self.device.as_deref(), self.width, self.height);
        let calendar = match self.kind {
            CalendarKind::Year => CalendarRequest::Year,
            CalendarKind::Life => CalendarRequest::Life(LifeParams {
                birth: self.birth,
                life_expectancy_years: self.expectancy,
            }),
            CalendarKind::Goal => CalendarRequest::Goal(GoalParams {
                target: self
                    .target
                    .unwrap_or_else(|| clock::midnight(clock::last_day_of_year(now))),
                title: self.title.clone(),
                start: self.start,
                date_format: if self.iso_dates {
                    DateFormat::Iso
                } else {
                    DateFormat::LongEnUs
                },
            }),
        };
        Ok(RenderRequest::new(canvas, self.theme()?, calendar))
    }

    /// Preview state matching what [`request`](Self::request) would render.
    ///
    /// The preview and the image endpoint always count a goal from January 1
    /// and spell its date out in full, so `--start` and `--iso-dates` are
    /// refused here rather than silently dropped.
    fn preview_state(&self, now: NaiveDateTime) -> Result<PreviewState> {
        if self.start.is_some() {
            bail!("--start cannot be expressed in an endpoint URL or preview");
        }
        if self.iso_dates {
            bail!("--iso-dates cannot be expressed in an endpoint URL or preview");
        }
        let mut state = PreviewState::for_date(now.date());
        state.kind = self.kind;
        state.device_id = self.device_id().to_string();
        state.size = self.width.zip(self.height);
        state.accent = self.theme()?.accent;
        state.birth = self.birth.date();
        state.life_expectancy = self.expectancy;
        if let Some(target) = self.target {
            state.target = target.date();
        }
        state.title = self.title.clone();
        Ok(state)
    }
}

fn load_theme(path: &Path) -> Result<Theme> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("read theme '{}'", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parse theme '{}'", path.display()))
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::WARN,
        (false, 1) => tracing::Level::INFO,
        (false, 2) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.cmd {
        Command::Render(args) => cmd_render(&args),
        Command::Stats(args) => cmd_stats(&args),
        Command::Url(args) => cmd_url(&args),
        Command::Query(args) => cmd_query(&args),
        Command::Devices => cmd_devices(),
        Command::Preview(args) => {
            let now = args.now();
            let state = args.preview_state(now)?;
            renderer::run_preview(state, args.theme()?, args.now)
        }
    }
}

fn cmd_render(args: &RenderArgs) -> Result<()> {
    let now = args.calendar.now();
    let wallpaper = render(&args.calendar.request(now)?, now)?;
    let out = args.out.clone().unwrap_or_else(|| {
        PathBuf::from(daymark_core::export_file_name(
            args.calendar.kind,
            args.calendar.device_id(),
        ))
    });

    let is_png = out
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    let bytes = if is_png {
        raster::rasterize_png(&wallpaper.scene)?
    } else {
        wallpaper.to_svg().into_bytes()
    };
    write_file(&out, &bytes)?;
    tracing::info!(path = %out.display(), bytes = bytes.len(), "wallpaper written");
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_stats(args: &StatsArgs) -> Result<()> {
    let now = args.calendar.now();
    let wallpaper = render(&args.calendar.request(now)?, now)?;
    let mut stdout = std::io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut stdout, &wallpaper.stats)?;
        writeln!(stdout)?;
    } else {
        for line in summary_lines(wallpaper.kind, &wallpaper.stats) {
            writeln!(stdout, "{:>10}  {}", line.value, line.label)?;
        }
    }
    Ok(())
}

fn cmd_url(args: &UrlArgs) -> Result<()> {
    let now = args.calendar.now();
    let state = args.calendar.preview_state(now)?;
    let url = daymark_core::build_render_url(&args.base, &state)?;
    writeln!(std::io::stdout().lock(), "{url}")?;
    Ok(())
}

fn cmd_query(args: &QueryArgs) -> Result<()> {
    let now = args.now.unwrap_or_else(|| SystemClock.now());
    tracing::debug!(?now, query = ?WallpaperQuery::parse(&args.query), "running endpoint");
    let response = handle_render_query(&args.query, now, &Theme::default());
    if !response.is_success() {
        bail!("endpoint returned {}: {}", response.status, response.body);
    }
    match &args.out {
        Some(path) => write_file(path, response.body.as_bytes()),
        None => {
            writeln!(std::io::stdout().lock(), "{}", response.body)?;
            Ok(())
        }
    }
}

fn cmd_devices() -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    for option in device_options() {
        let marker = if option.id == device::DEFAULT_DEVICE_ID {
            "*"
        } else {
            " "
        };
        writeln!(
            stdout,
            "{marker} {:<16} {:<20} {}",
            option.id, option.name, option.dimensions
        )?;
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}
