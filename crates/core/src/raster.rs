//! PNG export: rasterises the SVG translation of a scene with `resvg`.

use std::sync::Arc;

use daymark_protocol::Scene;
use resvg::{tiny_skia, usvg};

use crate::error::{RenderError, RenderResult};
use crate::svg::render_svg;

/// Rasterise `scene` at its native size and encode it as PNG.
///
/// Text is shaped with the host's system fonts; a missing family falls back
/// to whatever sans-serif face the font database resolves.
#[tracing::instrument(level = "debug", skip_all, fields(width = scene.width, height = scene.height))]
pub fn rasterize_png(scene: &Scene) -> RenderResult<Vec<u8>> {
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    tracing::trace!(faces = fontdb.len(), "font database loaded");

    let opts = usvg::Options {
        fontdb: Arc::new(fontdb),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(&render_svg(scene), &opts)
        .map_err(|e| RenderError::Raster(format!("parse svg: {e}")))?;

    let mut pixmap = tiny_skia::Pixmap::new(scene.width, scene.height).ok_or_else(|| {
        RenderError::Raster(format!(
            "failed to allocate {}x{} pixmap",
            scene.width, scene.height
        ))
    })?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| RenderError::Raster(format!("encode png: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use daymark_protocol::{CircleStyle, Color, DrawCommand, Point};

    #[test]
    fn produces_png_of_scene_size() {
        let scene = Scene {
            width: 40,
            height: 60,
            background: Color::BLACK,
            font_family: "sans-serif".into(),
            commands: vec![DrawCommand::Circle {
                center: Point::new(20.0, 30.0),
                radius: 10.0,
                style: CircleStyle::Fill,
                color: Color::WHITE,
                glow: None,
            }],
        };
        let png = rasterize_png(&scene).unwrap_or_default();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        // IHDR width and height, big-endian.
        assert_eq!(&png[16..20], &40u32.to_be_bytes());
        assert_eq!(&png[20..24], &60u32.to_be_bytes());
    }
}
