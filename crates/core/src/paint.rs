//! Imperative painter translator.
//!
//! Replays a [`Scene`] as a sequence of canvas-style calls so pixel backends
//! (a browser 2D context, a terminal cell grid) share the layout with the SVG
//! output instead of recomputing it.

use daymark_protocol::{
    CircleStyle, Color, DrawCommand, Fill, FontWeight, Glow, Point, Rect, Scene, TextAnchor,
    TextBaseline,
};

/// Per-call compositing state: global alpha and shadow blur in scene units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Effects {
    pub opacity: f64,
    pub shadow_blur: f64,
}

impl Effects {
    pub const NONE: Effects = Effects {
        opacity: 1.0,
        shadow_blur: 0.0,
    };

    fn shadow(blur: f64) -> Self {
        Effects {
            shadow_blur: blur,
            ..Effects::NONE
        }
    }

    fn translucent(opacity: f64) -> Self {
        Effects {
            opacity,
            ..Effects::NONE
        }
    }
}

impl Default for Effects {
    fn default() -> Self {
        Effects::NONE
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font<'a> {
    pub family: &'a str,
    pub size_px: f64,
    pub weight: FontWeight,
}

impl Font<'_> {
    /// CSS `font` shorthand, e.g. `bold 64px -apple-system, sans-serif`.
    pub fn css(&self) -> String {
        let weight = match self.weight {
            FontWeight::Regular => "",
            FontWeight::Bold => "bold ",
        };
        format!("{weight}{}px {}", self.size_px, self.family)
    }
}

/// A pixel surface that can be driven by [`paint_scene`].
pub trait Painter {
    fn fill_background(&mut self, width: f64, height: f64, color: Color);
    fn fill_circle(&mut self, center: Point, radius: f64, color: Color, effects: Effects);
    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        line_width: f64,
        color: Color,
        effects: Effects,
    );
    fn fill_rect(&mut self, rect: Rect, corner_radius: f64, fill: &Fill, effects: Effects);
    fn fill_text(
        &mut self,
        text: &str,
        position: Point,
        font: &Font<'_>,
        color: Color,
        anchor: TextAnchor,
        baseline: TextBaseline,
    );
}

/// Replay `scene` onto `painter` in paint order.
///
/// Halo glows become a second, larger translucent shape painted after the
/// base glyph; shadow glows are passed through as shadow blur on the glyph
/// itself.
pub fn paint_scene(scene: &Scene, painter: &mut impl Painter) {
    painter.fill_background(
        f64::from(scene.width),
        f64::from(scene.height),
        scene.background,
    );

    for cmd in &scene.commands {
        match cmd {
            DrawCommand::Circle {
                center,
                radius,
                style,
                color,
                glow,
            } => {
                let effects = match glow {
                    Some(Glow::Shadow { blur }) => Effects::shadow(*blur),
                    _ => Effects::NONE,
                };
                match style {
                    CircleStyle::Fill => painter.fill_circle(*center, *radius, *color, effects),
                    CircleStyle::Stroke { width } => {
                        painter.stroke_circle(*center, *radius, *width, *color, effects);
                    }
                }
                if let Some(Glow::Halo {
                    radius_scale,
                    opacity,
                }) = glow
                {
                    painter.fill_circle(
                        *center,
                        radius * radius_scale,
                        *color,
                        Effects::translucent(*opacity),
                    );
                }
            }
            DrawCommand::Rect {
                rect,
                corner_radius,
                fill,
                glow,
            } => {
                let effects = match glow {
                    Some(Glow::Shadow { blur }) => Effects::shadow(*blur),
                    _ => Effects::NONE,
                };
                painter.fill_rect(*rect, *corner_radius, fill, effects);
                if let Some(Glow::Halo {
                    radius_scale,
                    opacity,
                }) = glow
                {
                    let c = rect.center();
                    let (w, h) = (rect.w * radius_scale, rect.h * radius_scale);
                    painter.fill_rect(
                        Rect::new(c.x - w / 2.0, c.y - h / 2.0, w, h),
                        corner_radius * radius_scale,
                        fill,
                        Effects::translucent(*opacity),
                    );
                }
            }
            DrawCommand::Text {
                position,
                text,
                font_size_fraction,
                weight,
                color,
                anchor,
                baseline,
            } => {
                let font = Font {
                    family: &scene.font_family,
                    size_px: scene.font_px(*font_size_fraction),
                    weight: *weight,
                };
                painter.fill_text(text, *position, &font, *color, *anchor, *baseline);
            }
        }
    }
}

/// One recorded painter call.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCall {
    Background {
        width: f64,
        height: f64,
        color: Color,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: Color,
        effects: Effects,
    },
    StrokeCircle {
        center: Point,
        radius: f64,
        line_width: f64,
        color: Color,
        effects: Effects,
    },
    FillRect {
        rect: Rect,
        corner_radius: f64,
        fill: Fill,
        effects: Effects,
    },
    FillText {
        text: String,
        position: Point,
        font_css: String,
        color: Color,
        anchor: TextAnchor,
        baseline: TextBaseline,
    },
}

/// Painter that only records what it was asked to draw.
#[derive(Debug, Default)]
pub struct RecordingPainter {
    pub calls: Vec<PaintCall>,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Painter for RecordingPainter {
    fn fill_background(&mut self, width: f64, height: f64, color: Color) {
        self.calls.push(PaintCall::Background {
            width,
            height,
            color,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color, effects: Effects) {
        self.calls.push(PaintCall::FillCircle {
            center,
            radius,
            color,
            effects,
        });
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        line_width: f64,
        color: Color,
        effects: Effects,
    ) {
        self.calls.push(PaintCall::StrokeCircle {
            center,
            radius,
            line_width,
            color,
            effects,
        });
    }

    fn fill_rect(&mut self, rect: Rect, corner_radius: f64, fill: &Fill, effects: Effects) {
        self.calls.push(PaintCall::FillRect {
            rect,
            corner_radius,
            fill: *fill,
            effects,
        });
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
        self.calls.push(PaintCall::FillText {
            text: text.to_string(),
            position,
            font_css: font.css(),
            color,
            anchor,
            baseline,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(commands: Vec<DrawCommand>) -> Scene {
        Scene {
            width: 100,
            height: 200,
            background: Color::BLACK,
            font_family: "sans-serif".into(),
            commands,
        }
    }

    #[test]
    fn background_is_painted_first() {
        let mut painter = RecordingPainter::new();
        paint_scene(&scene(Vec::new()), &mut painter);
        assert_eq!(
            painter.calls,
            vec![PaintCall::Background {
                width: 100.0,
                height: 200.0,
                color: Color::BLACK
            }]
        );
    }

    #[test]
    fn halo_becomes_second_translucent_circle() {
        let accent = Color::rgb(0xff, 0x6b, 0x6b);
        let mut painter = RecordingPainter::new();
        paint_scene(
            &scene(vec![DrawCommand::Circle {
                center: Point::new(5.0, 5.0),
                radius: 3.0,
                style: CircleStyle::Fill,
                color: accent,
                glow: Some(Glow::Halo {
                    radius_scale: 2.0,
                    opacity: 0.3,
                }),
            }]),
            &mut painter,
        );
        assert_eq!(painter.calls.len(), 3);
        assert!(matches!(
            painter.calls[1],
            PaintCall::FillCircle { radius, effects, .. } if radius == 3.0 && effects == Effects::NONE
        ));
        assert!(matches!(
            painter.calls[2],
            PaintCall::FillCircle { radius, effects, .. } if radius == 6.0 && effects.opacity == 0.3
        ));
    }

    #[test]
    fn shadow_glow_sets_blur_on_the_glyph() {
        let mut painter = RecordingPainter::new();
        paint_scene(
            &scene(vec![DrawCommand::Rect {
                rect: Rect::new(0.0, 0.0, 4.0, 4.0),
                corner_radius: 0.0,
                fill: Fill::solid(Color::WHITE),
                glow: Some(Glow::Shadow { blur: 10.0 }),
            }]),
            &mut painter,
        );
        assert_eq!(painter.calls.len(), 2);
        assert!(matches!(
            painter.calls[1],
            PaintCall::FillRect { effects, .. } if effects.shadow_blur == 10.0
        ));
    }

    #[test]
    fn stroke_and_text_translate() {
        let mut painter = RecordingPainter::new();
        paint_scene(
            &scene(vec![
                DrawCommand::Circle {
                    center: Point::new(1.0, 1.0),
                    radius: 1.0,
                    style: CircleStyle::Stroke { width: 2.0 },
                    color: Color::WHITE,
                    glow: None,
                },
                DrawCommand::Text {
                    position: Point::new(50.0, 150.0),
                    text: "2025".into(),
                    font_size_fraction: 0.06,
                    weight: FontWeight::Bold,
                    color: Color::WHITE,
                    anchor: TextAnchor::Middle,
                    baseline: TextBaseline::Alphabetic,
                },
            ]),
            &mut painter,
        );
        assert!(matches!(
            painter.calls[1],
            PaintCall::StrokeCircle { line_width, .. } if line_width == 2.0
        ));
        match &painter.calls[2] {
            PaintCall::FillText { text, font_css, .. } => {
                assert_eq!(text, "2025");
                assert!(font_css.starts_with("bold 6"));
                assert!(font_css.ends_with("px sans-serif"));
            }
            other => panic!("unexpected call {other:?}"),
        }
    }
}
