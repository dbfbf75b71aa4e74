//! Links and file names for handing a wallpaper to something else.

use url::Url;

use crate::clock::{self, DateFormat};
use crate::error::{RenderError, RenderResult};
use crate::request::CalendarKind;
use crate::session::PreviewState;

/// Download name for an exported PNG, e.g. `life-calendar-iphone15pro.png`.
pub fn export_file_name(kind: CalendarKind, device_id: &str) -> String {
    format!("{kind}-calendar-{device_id}.png")
}

/// Image-endpoint URL that reproduces `state`.
///
/// Dimensions are written out from the resolved canvas rather than the
/// device id, so automation that only forwards `width`/`height` keeps
/// working. Existing query parameters on `base` are replaced.
pub fn build_render_url(base: &str, state: &PreviewState) -> RenderResult<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| RenderError::invalid_parameter("base", format!("{base:?}: {e}")))?;
    let canvas = state.canvas();

    {
        let mut query = url.query_pairs_mut();
        query
            .clear()
            .append_pair("type", state.kind.as_str())
            .append_pair("width", &canvas.width_px.to_string())
            .append_pair("height", &canvas.height_px.to_string())
            .append_pair("accent", &state.accent.to_hex_bare());
        match state.kind {
            CalendarKind::Year => {}
            CalendarKind::Life => {
                query
                    .append_pair("birth", &clock::format_date(state.birth, DateFormat::Iso))
                    .append_pair("expectancy", &state.life_expectancy.to_string());
            }
            CalendarKind::Goal => {
                query
                    .append_pair("target", &clock::format_date(state.target, DateFormat::Iso))
                    .append_pair("title", &state.title);
            }
        }
    }
    Ok(url)
}
