//! SVG renderer: converts a [`Scene`] into a standalone SVG document.

use daymark_protocol::{
    CircleStyle, Color, DrawCommand, Fill, FontWeight, Glow, Scene, TextAnchor, TextBaseline,
};

/// Render a scene as an SVG document string.
///
/// The document declares the scene size as both `width`/`height` and
/// `viewBox`, paints the background, then translates every command in
/// order. Gradients and blur filters get document-unique ids.
pub fn render_svg(scene: &Scene) -> String {
    let (width, height) = (scene.width, scene.height);
    let mut svg = String::with_capacity(scene.commands.len() * 120 + 256);
    svg.push_str(&format!(
        r#"<svg width="{width}" height="{height}" viewBox="0 0 {width} {height}" xmlns="http://www.w3.org/2000/svg">"#,
    ));
    svg.push_str(&format!(
        r#"<rect width="{width}" height="{height}"{}/>"#,
        paint("fill", scene.background),
    ));

    let font_family = escape_xml(&scene.font_family);
    let mut next_id = 0usize;

    for cmd in &scene.commands {
        match cmd {
            DrawCommand::Circle {
                center,
                radius,
                style,
                color,
                glow,
            } => {
                let filter = shadow_filter(&mut svg, &mut next_id, *glow, *color);
                let body = match style {
                    CircleStyle::Fill => paint("fill", *color),
                    CircleStyle::Stroke { width } => format!(
                        r#" fill="none"{} stroke-width="{width}""#,
                        paint("stroke", *color)
                    ),
                };
                svg.push_str(&format!(
                    r#"<circle cx="{}" cy="{}" r="{radius}"{body}{filter}/>"#,
                    center.x, center.y,
                ));
                if let Some(Glow::Halo {
                    radius_scale,
                    opacity,
                }) = glow
                {
                    svg.push_str(&format!(
                        r#"<circle cx="{}" cy="{}" r="{}"{} opacity="{opacity}"/>"#,
                        center.x,
                        center.y,
                        radius * radius_scale,
                        paint("fill", *color),
                    ));
                }
            }
            DrawCommand::Rect {
                rect,
                corner_radius,
                fill,
                glow,
            } => {
                let fill_attr = match fill {
                    Fill::Solid { color } => paint("fill", *color),
                    Fill::LinearGradient {
                        from,
                        to,
                        x_from,
                        x_to,
                    } => {
                        let id = format!("grad-{next_id}");
                        next_id += 1;
                        svg.push_str(&format!(
                            r#"<defs><linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="{x_from}" y1="0" x2="{x_to}" y2="0"><stop offset="0"{}/><stop offset="1"{}/></linearGradient></defs>"#,
                            paint("stop-color", *from),
                            paint("stop-color", *to),
                        ));
                        format!(r#" fill="url(#{id})""#)
                    }
                };
                let filter = shadow_filter(&mut svg, &mut next_id, *glow, fill.primary());
                svg.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{corner_radius}"{fill_attr}{filter}/>"#,
                    rect.x, rect.y, rect.w, rect.h,
                ));
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
                let weight = match weight {
                    FontWeight::Regular => "normal",
                    FontWeight::Bold => "bold",
                };
                let anchor = match anchor {
                    TextAnchor::Start => "start",
                    TextAnchor::Middle => "middle",
                    TextAnchor::End => "end",
                };
                let baseline = match baseline {
                    TextBaseline::Alphabetic => "",
                    TextBaseline::Middle => r#" dominant-baseline="central""#,
                };
                svg.push_str(&format!(
                    r#"<text x="{}" y="{}" font-family="{font_family}" font-size="{}" font-weight="{weight}" text-anchor="{anchor}"{baseline}{}>{}</text>"#,
                    position.x,
                    position.y,
                    scene.font_px(*font_size_fraction),
                    paint("fill", *color),
                    escape_xml(text),
                ));
            }
        }
    }

    svg.push_str("</svg>");
    svg
}

/// ` fill="#rrggbb"`, plus an opacity attribute for translucent colors.
fn paint(attr: &str, color: Color) -> String {
    let hex = format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b);
    if color.a == u8::MAX {
        format!(r#" {attr}="{hex}""#)
    } else {
        let opacity_attr = if attr == "stop-color" {
            "stop-opacity".to_string()
        } else {
            format!("{attr}-opacity")
        };
        let opacity = f64::from(color.a) / 255.0;
        format!(r#" {attr}="{hex}" {opacity_attr}="{opacity:.3}""#)
    }
}

/// Emit a drop-shadow filter definition for a shadow glow and return the
/// attribute that applies it. Halo glows and no glow yield an empty string.
fn shadow_filter(svg: &mut String, next_id: &mut usize, glow: Option<Glow>, color: Color) -> String {
    let Some(Glow::Shadow { blur }) = glow else {
        return String::new();
    };
    let id = format!("glow-{next_id}");
    *next_id += 1;
    // Canvas shadowBlur is twice the Gaussian standard deviation.
    svg.push_str(&format!(
        r#"<defs><filter id="{id}" x="-100%" y="-100%" width="300%" height="300%"><feDropShadow dx="0" dy="0" stdDeviation="{}"{}/></filter></defs>"#,
        blur / 2.0,
        paint("flood-color", color),
    ));
    format!(r#" filter="url(#{id})""#)
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
