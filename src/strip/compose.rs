use image::{RgbaImage, imageops};
use tokio::task::JoinSet;

use crate::{
    foundation::{
        core::{Rgb8, StripStyle},
        error::{BoothError, BoothResult},
    },
    strip::{
        blend::over_region,
        data_url::{STRIP_JPEG_QUALITY, decode_data_url_image, jpeg_data_url},
        label::render_label,
        layout::{StripLayout, strip_label},
    },
};

/// Presentation inputs for one composed strip.
#[derive(Clone, Debug, PartialEq)]
pub struct StripOptions {
    /// Date shown after the brand in the label, if any.
    pub date: Option<String>,
    /// Strip background.
    pub background: Rgb8,
    /// Label color.
    pub text_color: Rgb8,
    /// Geometry.
    pub layout: StripLayout,
}

impl StripOptions {
    /// Options using a named style palette and the default layout.
    pub fn styled(style: StripStyle, date: Option<String>) -> Self {
        Self {
            date,
            background: style.background(),
            text_color: style.text_color(),
            layout: StripLayout::default(),
        }
    }
}

impl Default for StripOptions {
    fn default() -> Self {
        Self::styled(StripStyle::default(), None)
    }
}

/// Compose encoded photos (data URLs, top to bottom) into one JPEG strip data URL.
///
/// All photos are decoded concurrently and must all succeed; the first decode failure rejects
/// the whole composition.
#[tracing::instrument(skip(images, opts), fields(count = images.len()))]
pub async fn compose_strip(images: &[String], opts: &StripOptions) -> BoothResult<String> {
    if images.is_empty() {
        return Err(BoothError::composition("cannot compose a strip from zero photos"));
    }

    let frames = decode_all(images).await?;
    let opts = opts.clone();
    let url = tokio::task::spawn_blocking(move || -> BoothResult<String> {
        let strip = render_strip(&frames, &opts)?;
        jpeg_data_url(&strip, STRIP_JPEG_QUALITY)
    })
    .await
    .map_err(|e| BoothError::Other(anyhow::Error::new(e).context("strip render task failed")))??;

    tracing::debug!(bytes = url.len(), "strip composed");
    Ok(url)
}

async fn decode_all(images: &[String]) -> BoothResult<Vec<RgbaImage>> {
    let mut set = JoinSet::new();
    for (idx, url) in images.iter().cloned().enumerate() {
        set.spawn_blocking(move || (idx, decode_data_url_image(&url)));
    }

    let mut slots: Vec<Option<RgbaImage>> = vec![None; images.len()];
    while let Some(joined) = set.join_next().await {
        let (idx, decoded) = joined.map_err(|e| {
            BoothError::Other(anyhow::Error::new(e).context("photo decode task failed"))
        })?;
        match decoded {
            Ok(img) => slots[idx] = Some(img),
            Err(e) => {
                set.abort_all();
                return Err(BoothError::composition(format!(
                    "photo {} could not be decoded: {}",
                    idx + 1,
                    e.user_message()
                )));
            }
        }
    }

    slots
        .into_iter()
        .map(|s| s.ok_or_else(|| BoothError::composition("photo decode task vanished")))
        .collect()
}

/// Lay decoded photos out on a bordered, labeled canvas.
///
/// Each photo is scaled to the square cell; non-square inputs are stretched like a canvas
/// `drawImage` into a fixed rect.
pub fn render_strip(frames: &[RgbaImage], opts: &StripOptions) -> BoothResult<RgbaImage> {
    let layout = &opts.layout;
    let (width, height) = layout.canvas_size(frames.len())?;
    let mut canvas = RgbaImage::from_pixel(width, height, opts.background.to_rgba());

    let cell = layout.photo_size;
    for (idx, frame) in frames.iter().enumerate() {
        let (x, y) = layout.photo_origin(idx);
        if frame.dimensions() == (cell, cell) {
            imageops::replace(&mut canvas, frame, i64::from(x), i64::from(y));
        } else {
            let scaled = imageops::resize(frame, cell, cell, imageops::FilterType::Triangle);
            imageops::replace(&mut canvas, &scaled, i64::from(x), i64::from(y));
        }
    }

    let band_top = layout.label_top(frames.len());
    let band_h = layout.label_band;
    if band_h > 0 {
        let text = strip_label(opts.date.as_deref());
        match render_label(&text, opts.text_color, width, band_h, layout.label_font_px) {
            Ok(premul) => over_region(&mut canvas, &premul, 0, band_top, width, band_h)?,
            Err(e) => tracing::warn!(error = %e, "strip label skipped"),
        }
    }

    Ok(canvas)
}

#[cfg(test)]
#[path = "../../tests/unit/strip/compose.rs"]
mod tests;
