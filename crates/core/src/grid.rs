//! Bounded grid packing shared by the year and life calendars.
//!
//! A grid occupies a horizontal band of the safe (non-inset) area. Each
//! calendar supplies a [`GridBand`] describing where the band sits and a
//! [`GlyphPolicy`] that turns one cell into one draw command.

use daymark_protocol::{DrawCommand, Rect};

use crate::device::CanvasSpec;

/// Placement of a grid band within the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBand {
    /// Left and right padding, as a fraction of canvas width.
    pub padding_fraction: f64,
    /// Band height as a fraction of the available height.
    pub height_fraction: f64,
    /// Leftover vertical space is divided by this to get the top offset.
    /// `2.0` centers the band; larger values push it upward.
    pub vertical_divisor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub rows: usize,
    /// Top-left corner of the band.
    pub origin_x: f64,
    pub origin_y: f64,
    pub spacing_x: f64,
    pub spacing_y: f64,
}

impl GridLayout {
    pub fn new(canvas: &CanvasSpec, columns: usize, rows: usize, band: GridBand) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let padding = canvas.width() * band.padding_fraction;
        let band_width = canvas.width() - padding * 2.0;
        let available = canvas.available_height();
        let band_height = available * band.height_fraction;
        Self {
            columns,
            rows,
            origin_x: padding,
            origin_y: canvas.safe_top_px() + (available - band_height) / band.vertical_divisor,
            spacing_x: band_width / columns as f64,
            spacing_y: band_height / rows as f64,
        }
    }

    /// Layout with just enough rows for `item_count` cells.
    pub fn for_items(canvas: &CanvasSpec, item_count: usize, columns: usize, band: GridBand) -> Self {
        let columns = columns.max(1);
        Self::new(canvas, columns, item_count.div_ceil(columns), band)
    }

    pub fn band_width(&self) -> f64 {
        self.spacing_x * self.columns as f64
    }

    pub fn band_height(&self) -> f64 {
        self.spacing_y * self.rows as f64
    }

    /// Full cell for a row-major index.
    pub fn cell(&self, index: usize) -> Rect {
        let col = index % self.columns;
        let row = index / self.columns;
        Rect::new(
            self.origin_x + col as f64 * self.spacing_x,
            self.origin_y + row as f64 * self.spacing_y,
            self.spacing_x,
            self.spacing_y,
        )
    }
}

/// Where a cell sits relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Past,
    Current,
    Future,
}

/// `current` is the 0-based index of the present cell; `None` means the
/// present lies beyond the grid and every cell is past.
pub fn cell_state(index: usize, current: Option<usize>) -> CellState {
    match current {
        None => CellState::Past,
        Some(c) if index < c => CellState::Past,
        Some(c) if index == c => CellState::Current,
        Some(_) => CellState::Future,
    }
}

/// Glyph shape and color rule for one calendar.
pub trait GlyphPolicy {
    fn glyph(&self, cell: Rect, state: CellState) -> DrawCommand;
}

/// Emit exactly one glyph per item, in index order.
pub fn paint_grid(
    layout: &GridLayout,
    item_count: usize,
    current: Option<usize>,
    policy: &impl GlyphPolicy,
) -> Vec<DrawCommand> {
    (0..item_count)
        .map(|i| policy.glyph(layout.cell(i), cell_state(i, current)))
        .collect()
}
