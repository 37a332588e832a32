//! SVG-to-PNG rasterization.
//!
//! Scenes arrive as SVG text, get parsed with `usvg` (system fonts loaded so
//! CJK titles resolve), rasterized with `resvg` into a `tiny_skia` pixmap,
//! and written out as straight-alpha PNG.

use std::path::Path;

use anyhow::Context as _;
use tracing::debug;

use crate::error::{KuusiError, KuusiResult};

/// Raster output configuration.
#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    /// Uniform scale factor applied to the scene's intrinsic size.
    pub scale: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { scale: 2.0 }
    }
}

/// A rendered frame in straight-alpha RGBA8.
#[derive(Clone, Debug)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

// Avoid pathological allocations from absurd scale factors.
const MAX_DIM: u32 = 16_384;

/// Rasterize an SVG scene at the requested scale.
pub fn rasterize_svg(svg: &str, opts: RenderOptions) -> KuusiResult<RasterImage> {
    if !opts.scale.is_finite() || opts.scale <= 0.0 {
        return Err(KuusiError::validation("render scale must be > 0"));
    }

    let usvg_opts = usvg::Options {
        fontdb: build_fontdb(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(svg, &usvg_opts)
        .map_err(|e| KuusiError::render(format!("svg parse failed: {e}")))?;

    let size = tree.size();
    let width = ((f64::from(size.width()) * opts.scale).ceil().max(1.0)) as u32;
    let height = ((f64::from(size.height()) * opts.scale).ceil().max(1.0)) as u32;
    if width > MAX_DIM || height > MAX_DIM {
        return Err(KuusiError::render(format!(
            "raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    debug!(width, height, scale = opts.scale, "rasterizing scene");

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| KuusiError::render("failed to allocate pixmap"))?;
    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    // tiny_skia keeps premultiplied pixels; PNG wants straight alpha.
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    Ok(RasterImage {
        width,
        height,
        data,
    })
}

fn build_fontdb() -> std::sync::Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    std::sync::Arc::new(db)
}

/// Rasterize and write a PNG, creating parent directories as needed.
pub fn render_svg_to_png(svg: &str, opts: RenderOptions, out: &Path) -> KuusiResult<()> {
    let image = rasterize_svg(svg, opts)?;
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))
            .map_err(KuusiError::Other)?;
    }
    image::save_buffer_with_format(
        out,
        &image.data,
        image.width,
        image.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| KuusiError::render(format!("write png '{}': {e}", out.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="8">
<rect width="100%" height="100%" fill="#102030"/>
</svg>"##;

    #[test]
    fn rasterize_scales_intrinsic_size() {
        let image = rasterize_svg(MINIMAL_SVG, RenderOptions { scale: 3.0 }).unwrap();
        assert_eq!(image.width, 30);
        assert_eq!(image.height, 24);
        assert_eq!(image.data.len(), 30 * 24 * 4);
        // Background fill must land in the pixels.
        assert_eq!(&image.data[0..4], &[0x10, 0x20, 0x30, 0xff]);
    }

    #[test]
    fn rejects_non_positive_scale() {
        assert!(rasterize_svg(MINIMAL_SVG, RenderOptions { scale: 0.0 }).is_err());
        assert!(rasterize_svg(MINIMAL_SVG, RenderOptions { scale: -1.0 }).is_err());
    }

    #[test]
    fn rejects_oversized_raster() {
        let err = rasterize_svg(MINIMAL_SVG, RenderOptions { scale: 1e6 }).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn rejects_malformed_svg() {
        let err = rasterize_svg("<svg", RenderOptions::default()).unwrap_err();
        assert!(err.to_string().contains("render error"));
    }
}
