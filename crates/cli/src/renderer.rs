use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use chrono::{Months, NaiveDateTime};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use daymark_core::device::DEVICES;
use daymark_core::paint::{Effects, Font, Painter, paint_scene};
use daymark_core::{
    CalendarKind, Clock, FixedClock, PreviewSession, PreviewState, Scene, SystemClock, Theme,
};
use daymark_protocol::{Color, Fill, Point, Rect, TextAnchor, TextBaseline};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::Rect as Area,
    style::{Color as TermColor, Style},
    widgets::{Block, Paragraph},
};

const ACCENTS: [Color; 6] = [
    Color::rgb(0xff, 0x6b, 0x6b),
    Color::rgb(0x4e, 0xcd, 0xc4),
    Color::rgb(0xff, 0xe6, 0x6d),
    Color::rgb(0xa8, 0x55, 0xf7),
    Color::rgb(0x3b, 0x82, 0xf6),
    Color::rgb(0x22, 0xc5, 0x5e),
];

fn term_color(c: Color) -> TermColor {
    TermColor::Rgb(c.r, c.g, c.b)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
    /// Highlighted glyphs win over anything painted into the same cell later.
    pinned: bool,
}

/// Paints a scene onto a grid of terminal cells.
///
/// Terminal cells are roughly twice as tall as they are wide, so one row
/// covers twice the scene distance of one column. The scene is scaled to
/// fit and centered.
struct CellPainter {
    cols: u16,
    rows: u16,
    /// Scene units per column.
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    cells: Vec<Cell>,
}

impl CellPainter {
    fn new(scene: &Scene, cols: u16, rows: u16) -> Self {
        let (w, h) = (f64::from(scene.width), f64::from(scene.height));
        let scale = (w / f64::from(cols.max(1))).max(h / (2.0 * f64::from(rows.max(1))));
        let offset_x = (f64::from(cols) - w / scale) / 2.0;
        let offset_y = (f64::from(rows) - h / (2.0 * scale)) / 2.0;
        let blank = Cell {
            ch: ' ',
            fg: Color::WHITE,
            bg: Color::BLACK,
            pinned: false,
        };
        Self {
            cols,
            rows,
            scale,
            offset_x,
            offset_y,
            cells: vec![blank; usize::from(cols) * usize::from(rows)],
        }
    }

    fn col(&self, x: f64) -> f64 {
        x / self.scale + self.offset_x
    }

    fn row(&self, y: f64) -> f64 {
        y / (2.0 * self.scale) + self.offset_y
    }

    fn cell_mut(&mut self, col: i64, row: i64) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= i64::from(self.cols) || row >= i64::from(self.rows) {
            return None;
        }
        let idx = row as usize * usize::from(self.cols) + col as usize;
        self.cells.get_mut(idx)
    }

    fn put(&mut self, at: Point, ch: char, fg: Color, pin: bool) {
        let (col, row) = (self.col(at.x).floor() as i64, self.row(at.y).floor() as i64);
        if let Some(cell) = self.cell_mut(col, row)
            && !cell.pinned
        {
            cell.ch = ch;
            cell.fg = fg;
            cell.pinned = pin;
        }
    }

    fn blit(&self, buf: &mut ratatui::buffer::Buffer, area: Area) {
        for row in 0..self.rows.min(area.height) {
            for col in 0..self.cols.min(area.width) {
                let cell = self.cells[usize::from(row) * usize::from(self.cols) + usize::from(col)];
                buf[(area.x + col, area.y + row)]
                    .set_char(cell.ch)
                    .set_fg(term_color(cell.fg))
                    .set_bg(term_color(cell.bg));
            }
        }
    }
}

fn mix(from: Color, to: Color, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    Color::rgb(lerp(from.r, to.r), lerp(from.g, to.g), lerp(from.b, to.b))
}

impl Painter for CellPainter {
    fn fill_background(&mut self, _width: f64, _height: f64, color: Color) {
        for cell in &mut self.cells {
            cell.bg = color;
        }
    }

    fn fill_circle(&mut self, center: Point, _radius: f64, color: Color, effects: Effects) {
        // A translucent pass is the glow of the glyph just painted.
        let highlight = effects.opacity < 1.0 || effects.shadow_blur > 0.0;
        self.put(center, '●', color, highlight);
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        _radius: f64,
        _line_width: f64,
        color: Color,
        _effects: Effects,
    ) {
        self.put(center, '○', color, false);
    }

    fn fill_rect(&mut self, rect: Rect, _corner_radius: f64, fill: &Fill, effects: Effects) {
        let highlight = effects.opacity < 1.0 || effects.shadow_blur > 0.0;
        let (c0, c1) = (self.col(rect.x), self.col(rect.x + rect.w));
        let (r0, r1) = (self.row(rect.y), self.row(rect.y + rect.h));
        if c1 - c0 < 1.5 && r1 - r0 < 1.5 {
            self.put(rect.center(), '■', fill.primary(), highlight);
            return;
        }
        for row in r0.floor() as i64..r1.ceil() as i64 {
            for col in c0.floor() as i64..c1.ceil() as i64 {
                let fg = match *fill {
                    Fill::Solid { color } => color,
                    Fill::LinearGradient {
                        from,
                        to,
                        x_from,
                        x_to,
                    } => {
                        let x = (col as f64 - self.offset_x + 0.5) * self.scale;
                        mix(from, to, (x - x_from) / (x_to - x_from))
                    }
                };
                if let Some(cell) = self.cell_mut(col, row)
                    && !cell.pinned
                {
                    cell.ch = '█';
                    cell.fg = fg;
                }
            }
        }
    }

    fn fill_text(
        &mut self,
        text: &str,
        position: Point,
        _font: &Font<'_>,
        color: Color,
        anchor: TextAnchor,
        _baseline: TextBaseline,
    ) {
        let len = text.chars().count() as f64;
        let start = match anchor {
            TextAnchor::Start => self.col(position.x),
            TextAnchor::Middle => self.col(position.x) - len / 2.0,
            TextAnchor::End => self.col(position.x) - len,
        };
        let row = self.row(position.y).floor() as i64;
        let start = start.round() as i64;
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.cell_mut(start + i as i64, row) {
                cell.ch = ch;
                cell.fg = color;
                cell.pinned = false;
            }
        }
    }
}

/// What one key press does to the preview.
fn apply_key(state: &mut PreviewState, code: KeyCode) -> bool {
    match code {
        KeyCode::Tab | KeyCode::Char('t') => {
            let all = CalendarKind::ALL;
            let idx = all.iter().position(|k| *k == state.kind).unwrap_or(0);
            state.kind = all[(idx + 1) % all.len()];
        }
        KeyCode::Char('d') => {
            let idx = DEVICES
                .iter()
                .position(|d| d.id == state.device_id)
                .map_or(0, |i| (i + 1) % DEVICES.len());
            state.device_id = DEVICES[idx].id.to_string();
            state.size = None;
        }
        KeyCode::Char('c') => {
            let idx = ACCENTS
                .iter()
                .position(|c| *c == state.accent)
                .map_or(0, |i| (i + 1) % ACCENTS.len());
            state.accent = ACCENTS[idx];
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            state.life_expectancy = state.life_expectancy.saturating_add(1);
        }
        KeyCode::Char('-') => state.life_expectancy = state.life_expectancy.saturating_sub(1),
        KeyCode::Left | KeyCode::Right => {
            let forward = code == KeyCode::Right;
            let shift = |date: chrono::NaiveDate, months: u32| {
                if forward {
                    date.checked_add_months(Months::new(months))
                } else {
                    date.checked_sub_months(Months::new(months))
                }
                .unwrap_or(date)
            };
            match state.kind {
                CalendarKind::Life => state.birth = shift(state.birth, 12),
                CalendarKind::Goal => state.target = shift(state.target, 1),
                CalendarKind::Year => return false,
            }
        }
        _ => return false,
    }
    true
}

fn now(frozen: Option<NaiveDateTime>) -> NaiveDateTime {
    match frozen {
        Some(at) => FixedClock(at).now(),
        None => SystemClock.now(),
    }
}

pub fn run_preview(state: PreviewState, theme: Theme, frozen: Option<NaiveDateTime>) -> Result<()> {
    let mut session = PreviewSession::new(state, theme);
    // Render once up front so a bad starting state fails before the
    // terminal is taken over.
    session.refresh(now(frozen))?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = preview_loop(&mut terminal, &mut session, frozen);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn preview_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    session: &mut PreviewSession,
    frozen: Option<NaiveDateTime>,
) -> Result<()> {
    let mut message = String::new();

    loop {
        terminal.draw(|frame| {
            let area = frame.area();

            let s = session.state();
            let header_area = Area::new(0, 0, area.width, 1);
            let header = Block::default()
                .title(format!(
                    " daymark: {} on {} | tab type | d device | c color | ←→ date | +/- years | e export | q quit ",
                    s.kind, s.device_id
                ))
                .style(Style::default().fg(TermColor::White).bg(TermColor::DarkGray));
            frame.render_widget(header, header_area);

            let status: Vec<String> = session
                .summary()
                .iter()
                .map(|line| format!("{} {}", line.value, line.label))
                .collect();
            let status = if message.is_empty() {
                status.join("  ·  ")
            } else {
                format!("{}  |  {message}", status.join("  ·  "))
            };
            let status_area = Area::new(0, area.height.saturating_sub(1), area.width, 1);
            frame.render_widget(
                Paragraph::new(status).style(Style::default().fg(TermColor::Gray)),
                status_area,
            );

            let content = Area::new(0, 1, area.width, area.height.saturating_sub(2));
            if let Some(wallpaper) = session.wallpaper() {
                let mut painter = CellPainter::new(&wallpaper.scene, content.width, content.height);
                paint_scene(&wallpaper.scene, &mut painter);
                painter.blit(frame.buffer_mut(), content);
            }
        })?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Char('e') => {
                let path = session.file_name();
                message = match session
                    .export_png()
                    .map_err(anyhow::Error::from)
                    .and_then(|png| std::fs::write(&path, png).map_err(anyhow::Error::from))
                {
                    Ok(()) => format!("exported {path}"),
                    Err(e) => format!("export failed: {e}"),
                };
            }
            code => {
                if apply_key(session.state_mut(), code) {
                    message = match session.refresh(now(frozen)) {
                        Ok(_) => String::new(),
                        Err(e) => format!("error: {e}"),
                    };
                }
            }
        }
    }

    Ok(())
}
