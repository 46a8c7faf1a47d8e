//! Filter engine: a closed set of pixel transforms applied in place to captured frames, plus
//! cheap CSS approximations for the live preview.
//!
//! The preview strings are not bit-identical to [`apply_filter`]; live preview favours frame
//! rate over exactness.

use std::{fmt, str::FromStr};

use image::RgbaImage;
use rand::Rng;

use crate::foundation::error::{BoothError, BoothResult};

/// Separable gaussian blur.
pub mod blur;
pub mod tone;

/// Grain amplitude as a fraction of the full channel range.
pub const FILM_GRAIN_INTENSITY: f32 = 0.12;
/// Blur standard deviation (px) for [`FilterKind::Cute`].
pub const CUTE_BLUR_SIGMA: f32 = 2.0;
/// Blur standard deviation (px) for [`FilterKind::Film`].
pub const FILM_BLUR_SIGMA: f32 = 0.5;

/// Every filter the booth offers.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum FilterKind {
    /// Identity.
    #[default]
    Normal,
    /// Channel-mean grayscale.
    BlackAndWhite,
    /// Bright, pink-warm, softened.
    Cute,
    /// Green-tinted sepia with grain.
    Film,
}

/// Immutable descriptor of a filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterSpec {
    /// Stable identifier (`normal`, `blackAndWhite`, `cute`, `film`).
    pub id: &'static str,
    /// Human label.
    pub label: &'static str,
    /// CSS `filter` value approximating the transform on a live video element.
    pub css_preview: &'static str,
}

impl FilterKind {
    /// Catalogue in display order.
    pub const ALL: [FilterKind; 4] = [
        FilterKind::Normal,
        FilterKind::BlackAndWhite,
        FilterKind::Cute,
        FilterKind::Film,
    ];

    /// Descriptor for this filter.
    pub fn spec(self) -> FilterSpec {
        match self {
            Self::Normal => FilterSpec {
                id: "normal",
                label: "Normal",
                css_preview: "none",
            },
            Self::BlackAndWhite => FilterSpec {
                id: "blackAndWhite",
                label: "Black & White",
                css_preview: "grayscale(100%)",
            },
            Self::Cute => FilterSpec {
                id: "cute",
                label: "Cute",
                css_preview: "brightness(1.15) contrast(0.95) saturate(1.1) blur(0.5px) sepia(15%) hue-rotate(320deg)",
            },
            Self::Film => FilterSpec {
                id: "film",
                label: "Film",
                css_preview: "sepia(25%) hue-rotate(60deg) saturate(120%) contrast(1.05) blur(0.5px)",
            },
        }
    }

    /// Stable identifier.
    pub fn id(self) -> &'static str {
        self.spec().id
    }

    /// Human label.
    pub fn label(self) -> &'static str {
        self.spec().label
    }

    /// Live-preview CSS filter.
    pub fn css_filter(self) -> &'static str {
        self.spec().css_preview
    }

    fn blur_sigma(self) -> Option<f32> {
        match self {
            Self::Cute => Some(CUTE_BLUR_SIGMA),
            Self::Film => Some(FILM_BLUR_SIGMA),
            Self::Normal | Self::BlackAndWhite => None,
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for FilterKind {
    type Err = BoothError;

    fn from_str(s: &str) -> BoothResult<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| BoothError::validation(format!("unknown filter '{s}'")))
    }
}

/// Apply `kind` in place using the thread RNG for film grain.
pub fn apply_filter(img: &mut RgbaImage, kind: FilterKind) {
    apply_filter_with_rng(img, kind, &mut rand::thread_rng());
}

/// Apply `kind` in place.
///
/// Tone changes always land. The blur pass is cosmetic: if it fails the frame keeps its toned
/// pixels and the failure is only logged.
pub fn apply_filter_with_rng<R: Rng + ?Sized>(img: &mut RgbaImage, kind: FilterKind, rng: &mut R) {
    let tone: fn([u8; 3]) -> [u8; 3] = match kind {
        FilterKind::Normal => return,
        FilterKind::BlackAndWhite => tone::black_and_white,
        FilterKind::Cute => tone::cute,
        FilterKind::Film => tone::film,
    };

    for px in img.pixels_mut() {
        let [r, g, b] = tone([px[0], px[1], px[2]]);
        px.0[..3].copy_from_slice(&[r, g, b]);
    }

    if let Some(sigma) = kind.blur_sigma() {
        soft_blur(img, sigma);
    }

    if kind == FilterKind::Film {
        add_grain(img, FILM_GRAIN_INTENSITY, rng);
    }
}

fn soft_blur(img: &mut RgbaImage, sigma: f32) {
    let (w, h) = img.dimensions();
    match blur::gaussian_blur_rgba8(img.as_raw(), w, h, sigma) {
        Ok(out) => img.copy_from_slice(&out),
        Err(e) => tracing::warn!(error = %e, sigma, "blur pass skipped"),
    }
}

fn add_grain<R: Rng + ?Sized>(img: &mut RgbaImage, intensity: f32, rng: &mut R) {
    let amplitude = intensity * 255.0;
    for px in img.pixels_mut() {
        let delta = (rng.r#gen::<f32>() - 0.5) * amplitude;
        let [r, g, b] = tone::grain([px[0], px[1], px[2]], delta);
        px.0[..3].copy_from_slice(&[r, g, b]);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/mod.rs"]
mod tests;
