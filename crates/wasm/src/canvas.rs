//! `Painter` implementation for a browser 2D canvas context.

use std::f64::consts::TAU;

use daymark_core::paint::{Effects, Font, Painter};
use daymark_protocol::{Color, Fill, Point, Rect, TextAnchor, TextBaseline};
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// Paints onto a `CanvasRenderingContext2d`.
///
/// Canvas calls that can throw are recorded instead of aborting the scene;
/// [`CanvasPainter::finish`] reports the first one.
pub struct CanvasPainter<'a> {
    ctx: &'a CanvasRenderingContext2d,
    error: Option<JsValue>,
}

impl<'a> CanvasPainter<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
        Self { ctx, error: None }
    }

    pub fn finish(self) -> Result<(), JsValue> {
        self.error.map_or(Ok(()), Err)
    }

    fn check(&mut self, result: Result<(), JsValue>) {
        if let Err(e) = result
            && self.error.is_none()
        {
            self.error = Some(e);
        }
    }

    fn apply(&self, effects: Effects, shadow_color: Color) {
        self.ctx.set_global_alpha(effects.opacity);
        if effects.shadow_blur > 0.0 {
            self.ctx.set_shadow_color(&shadow_color.to_hex());
            self.ctx.set_shadow_blur(effects.shadow_blur);
        }
    }

    fn circle_path(&mut self, center: Point, radius: f64) {
        self.ctx.begin_path();
        let arc = self.ctx.arc(center.x, center.y, radius, 0.0, TAU);
        self.check(arc);
    }

    fn rounded_rect_path(&mut self, rect: Rect, radius: f64) {
        let r = radius.min(rect.w / 2.0).min(rect.h / 2.0).max(0.0);
        let (x, y, w, h) = (rect.x, rect.y, rect.w, rect.h);
        let ctx = self.ctx;
        ctx.begin_path();
        ctx.move_to(x + r, y);
        let corners = [
            ctx.arc_to(x + w, y, x + w, y + h, r),
            ctx.arc_to(x + w, y + h, x, y + h, r),
            ctx.arc_to(x, y + h, x, y, r),
            ctx.arc_to(x, y, x + w, y, r),
        ];
        for corner in corners {
            self.check(corner);
        }
        ctx.close_path();
    }
}

impl Painter for CanvasPainter<'_> {
    fn fill_background(&mut self, width: f64, height: f64, color: Color) {
        self.ctx.set_fill_style_str(&color.to_hex());
        self.ctx.fill_rect(0.0, 0.0, width, height);
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color, effects: Effects) {
        self.ctx.save();
        self.apply(effects, color);
        self.ctx.set_fill_style_str(&color.to_hex());
        self.circle_path(center, radius);
        self.ctx.fill();
        self.ctx.restore();
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        line_width: f64,
        color: Color,
        effects: Effects,
    ) {
        self.ctx.save();
        self.apply(effects, color);
        self.ctx.set_stroke_style_str(&color.to_hex());
        self.ctx.set_line_width(line_width);
        self.circle_path(center, radius);
        self.ctx.stroke();
        self.ctx.restore();
    }

    fn fill_rect(&mut self, rect: Rect, corner_radius: f64, fill: &Fill, effects: Effects) {
        self.ctx.save();
        self.apply(effects, fill.primary());
        match fill {
            Fill::Solid { color } => self.ctx.set_fill_style_str(&color.to_hex()),
            Fill::LinearGradient {
                from,
                to,
                x_from,
                x_to,
            } => {
                let gradient = self.ctx.create_linear_gradient(*x_from, 0.0, *x_to, 0.0);
                let stops = [
                    gradient.add_color_stop(0.0, &from.to_hex()),
                    gradient.add_color_stop(1.0, &to.to_hex()),
                ];
                for stop in stops {
                    self.check(stop);
                }
                self.ctx.set_fill_style_canvas_gradient(&gradient);
            }
        }
        if corner_radius > 0.0 {
            self.rounded_rect_path(rect, corner_radius);
            self.ctx.fill();
        } else {
            self.ctx.fill_rect(rect.x, rect.y, rect.w, rect.h);
        }
        self.ctx.restore();
    }

    fn fill_text(
        &mut self,
        text: &str,
        position: Point,
        font: &Font<'_>,
        color: Color,
        anchor: TextAnchor,
        baseline: TextBaseline,
    ) {
        self.ctx.set_font(&font.css());
        self.ctx.set_fill_style_str(&color.to_hex());
        self.ctx.set_text_align(match anchor {
            TextAnchor::Start => "left",
            TextAnchor::Middle => "center",
            TextAnchor::End => "right",
        });
        self.ctx.set_text_baseline(match baseline {
            TextBaseline::Alphabetic => "alphabetic",
            TextBaseline::Middle => "middle",
        });
        let drawn = self.ctx.fill_text(text, position.x, position.y);
        self.check(drawn);
    }
}
