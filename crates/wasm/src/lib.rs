mod canvas;
mod handles;

use std::sync::{Mutex, MutexGuard};

use chrono::Local;
use daymark_core::paint::paint_scene;
use daymark_core::{
    CalendarKind, PreviewSession, PreviewState, SystemClock, Theme, clock, device_options,
    handle_render_query,
};
use daymark_protocol::Color;
use serde::Deserialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::canvas::CanvasPainter;
use crate::handles::Handles;

static SESSIONS: Mutex<Handles<PreviewSession>> = Mutex::new(Handles::new());

fn js_err(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

fn sessions() -> Result<MutexGuard<'static, Handles<PreviewSession>>, JsError> {
    SESSIONS.lock().map_err(|_| JsError::new("session store poisoned"))
}

fn with_session<T>(
    handle: usize,
    f: impl FnOnce(&mut PreviewSession) -> Result<T, JsError>,
) -> Result<T, JsError> {
    let mut sessions = sessions()?;
    let session = sessions
        .get_mut(handle)
        .ok_or_else(|| JsError::new("invalid session handle"))?;
    f(session)
}

/// Fields the page can change. Absent fields are left as they are.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StatePatch {
    calendar_type: Option<String>,
    device_id: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    accent_color: Option<String>,
    birth_date: Option<String>,
    life_expectancy: Option<u32>,
    target_date: Option<String>,
    goal_title: Option<String>,
}

impl StatePatch {
    fn apply(self, state: &mut PreviewState) -> Result<(), JsError> {
        if let Some(kind) = self.calendar_type {
            state.kind = kind.parse::<CalendarKind>().map_err(js_err)?;
        }
        if let Some(id) = self.device_id {
            state.device_id = id;
            state.size = None;
        }
        if let Some(size) = self.width.zip(self.height) {
            state.size = Some(size);
        }
        if let Some(hex) = self.accent_color {
            state.accent = Color::from_hex(&hex)
                .ok_or_else(|| JsError::new(&format!("invalid accent color {hex:?}")))?;
        }
        if let Some(raw) = self.birth_date {
            state.birth = clock::parse_date("birth", &raw).map_err(js_err)?.date();
        }
        if let Some(years) = self.life_expectancy {
            state.life_expectancy = years;
        }
        if let Some(raw) = self.target_date {
            state.target = clock::parse_date("target", &raw).map_err(js_err)?.date();
        }
        if let Some(title) = self.goal_title {
            state.title = if title.trim().is_empty() {
                daymark_core::session::PREVIEW_GOAL_TITLE.to_string()
            } else {
                title
            };
        }
        Ok(())
    }
}

/// Start a preview session with today's defaults. Returns a handle.
#[wasm_bindgen]
pub fn create_session(theme_json: Option<String>) -> Result<usize, JsError> {
    let theme: Theme = match theme_json.as_deref() {
        Some(json) => serde_json::from_str(json).map_err(js_err)?,
        None => Theme::default(),
    };
    let today = Local::now().date_naive();
    let session = PreviewSession::new(PreviewState::for_date(today), theme);
    Ok(sessions()?.insert(session))
}

/// Release a session. Its handle is invalid afterwards and may be reused.
#[wasm_bindgen]
pub fn drop_session(handle: usize) -> Result<(), JsError> {
    sessions()?
        .remove(handle)
        .map(drop)
        .ok_or_else(|| JsError::new("invalid session handle"))
}

/// Apply a JSON patch such as `{"calendarType": "life", "birthDate": "1988-04-02"}`.
#[wasm_bindgen]
pub fn update_session(handle: usize, patch_json: &str) -> Result<(), JsError> {
    let patch: StatePatch = serde_json::from_str(patch_json).map_err(js_err)?;
    with_session(handle, |session| patch.apply(session.state_mut()))
}

fn canvas_by_id(canvas_id: &str) -> Result<HtmlCanvasElement, JsError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsError::new("no document"))?
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsError::new(&format!("no element with id {canvas_id:?}")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsError::new(&format!("element {canvas_id:?} is not a canvas")))
}

/// Re-render and paint onto the canvas, returning the stats panel as JSON.
///
/// If rendering fails the canvas is left untouched and the error is thrown.
#[wasm_bindgen]
pub fn render_preview(handle: usize, canvas_id: &str) -> Result<String, JsError> {
    let canvas = canvas_by_id(canvas_id)?;
    with_session(handle, |session| {
        let wallpaper = session.refresh_with_clock(&SystemClock).map_err(js_err)?;
        canvas.set_width(wallpaper.scene.width);
        canvas.set_height(wallpaper.scene.height);
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| JsError::new("getContext failed"))?
            .ok_or_else(|| JsError::new("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsError::new("unexpected context type"))?;
        let mut painter = CanvasPainter::new(&ctx);
        paint_scene(&wallpaper.scene, &mut painter);
        painter
            .finish()
            .map_err(|e| JsError::new(&format!("canvas error: {e:?}")))?;
        serde_json::to_string(&session.summary()).map_err(js_err)
    })
}

/// PNG data URL of what the canvas currently shows.
#[wasm_bindgen]
pub fn export_png(canvas_id: &str) -> Result<String, JsError> {
    canvas_by_id(canvas_id)?
        .to_data_url_with_type("image/png")
        .map_err(|_| JsError::new("canvas export failed"))
}

#[wasm_bindgen]
pub fn export_file_name(handle: usize) -> Result<String, JsError> {
    with_session(handle, |session| Ok(session.file_name()))
}

/// Image-endpoint URL reproducing the current preview.
#[wasm_bindgen]
pub fn share_url(handle: usize, base: &str) -> Result<String, JsError> {
    with_session(handle, |session| {
        session.share_url(base).map(String::from).map_err(js_err)
    })
}

/// Raw stats record of the last rendered wallpaper as JSON.
#[wasm_bindgen]
pub fn get_stats(handle: usize) -> Result<String, JsError> {
    with_session(handle, |session| {
        let wallpaper = session
            .wallpaper()
            .ok_or_else(|| JsError::new("nothing rendered yet"))?;
        serde_json::to_string(&wallpaper.stats).map_err(js_err)
    })
}

/// Draw commands of the last rendered wallpaper as JSON.
#[wasm_bindgen]
pub fn get_commands(handle: usize) -> Result<String, JsError> {
    with_session(handle, |session| {
        let wallpaper = session
            .wallpaper()
            .ok_or_else(|| JsError::new("nothing rendered yet"))?;
        serde_json::to_string(wallpaper.commands()).map_err(js_err)
    })
}

#[wasm_bindgen]
pub fn get_svg(handle: usize) -> Result<String, JsError> {
    with_session(handle, |session| {
        session
            .wallpaper()
            .map(daymark_core::Wallpaper::to_svg)
            .ok_or_else(|| JsError::new("nothing rendered yet"))
    })
}

/// Device picker entries as JSON.
#[wasm_bindgen]
pub fn get_device_options() -> Result<String, JsError> {
    serde_json::to_string(&device_options()).map_err(js_err)
}

/// Run the image endpoint in the browser. Returns the SVG body or throws
/// with the endpoint's error text.
#[wasm_bindgen]
pub fn render_query_svg(query: &str) -> Result<String, JsError> {
    let now = Local::now().naive_local();
    let response = handle_render_query(query, now, &Theme::default());
    if response.is_success() {
        Ok(response.body)
    } else {
        Err(JsError::new(&response.body))
    }
}
