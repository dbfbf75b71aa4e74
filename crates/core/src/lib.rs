//! Layout engine for daymark wallpapers.
//!
//! A [`RenderRequest`] names a calendar, a canvas and a theme. [`render`]
//! turns it into a [`Wallpaper`]: a backend-agnostic [`Scene`] of draw
//! commands plus a [`StatsRecord`]. The scene can then be serialised as SVG
//! ([`svg::render_svg`]), replayed onto any pixel surface
//! ([`paint::paint_scene`]), or rasterised to PNG (`raster` feature).

pub mod calendars;
pub mod clock;
pub mod device;
pub mod endpoint;
pub mod error;
pub mod format;
pub mod grid;
pub mod paint;
#[cfg(feature = "raster")]
pub mod raster;
pub mod request;
pub mod session;
pub mod share;
pub mod svg;

pub use clock::{Clock, DateFormat, FixedClock, SystemClock};
pub use device::{CanvasSpec, DevicePreset, device_options, resolve};
pub use endpoint::{EndpointResponse, WallpaperQuery, handle_render_query};
pub use error::{RenderError, RenderResult};
pub use request::{
    CalendarKind, CalendarRequest, RenderRequest, Wallpaper, render, render_with_clock,
};
pub use session::{PreviewSession, PreviewState, SummaryLine, summary_lines};
pub use share::{build_render_url, export_file_name};

pub use daymark_protocol::{Scene, StatsRecord, Theme};
