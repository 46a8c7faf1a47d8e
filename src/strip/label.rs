use std::sync::{Arc, OnceLock};

use anyhow::Context;

use crate::foundation::{
    core::Rgb8,
    error::{BoothError, BoothResult},
};

fn system_fontdb() -> Arc<usvg::fontdb::Database> {
    static DB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts for strip labels");
        Arc::new(db)
    })
    .clone()
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

pub(crate) fn label_svg(text: &str, color: Rgb8, width: u32, height: u32, font_px: f32) -> String {
    let cx = f64::from(width) / 2.0;
    // Approximate middle baseline; usvg's dominant-baseline support varies by font.
    let baseline = f64::from(height) / 2.0 + f64::from(font_px) * 0.35;
    let spacing = font_px * 0.14;
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}"><text x="{cx}" y="{baseline}" text-anchor="middle" font-family="sans-serif" font-size="{font_px}" letter-spacing="{spacing}" fill="{fill}">{body}</text></svg>"#,
        fill = color.to_hex(),
        body = escape_xml(text),
    )
}

/// Rasterize one centered label line into a premultiplied RGBA8 buffer of `width * height`.
///
/// Hosts without usable fonts produce a fully transparent buffer.
pub fn render_label(
    text: &str,
    color: Rgb8,
    width: u32,
    height: u32,
    font_px: f32,
) -> BoothResult<Vec<u8>> {
    if !font_px.is_finite() || font_px <= 0.0 {
        return Err(BoothError::validation("label font size must be finite and > 0"));
    }
    let svg = label_svg(text, color, width, height, font_px);
    let opts = usvg::Options {
        fontdb: system_fontdb(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(svg.as_bytes(), &opts).context("parse label svg")?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| BoothError::composition("failed to allocate label pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/strip/label.rs"]
mod tests;
