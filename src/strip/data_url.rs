use anyhow::Context;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{RgbaImage, codecs::jpeg::JpegEncoder};

use crate::foundation::error::{BoothError, BoothResult};

/// MIME type of every image the booth produces.
pub const JPEG_MIME: &str = "image/jpeg";
/// JPEG quality for individual captured frames.
pub const FRAME_JPEG_QUALITY: u8 = 90;
/// JPEG quality for composed strips.
pub const STRIP_JPEG_QUALITY: u8 = 95;

/// Encode an RGBA image as baseline JPEG. Alpha is dropped.
pub fn encode_jpeg(img: &RgbaImage, quality: u8) -> BoothResult<Vec<u8>> {
    let rgb = image::DynamicImage::ImageRgba8(img.clone()).to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
        .encode(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
        .context("encode jpeg")?;
    Ok(buf)
}

/// Wrap encoded bytes as `data:<mime>;base64,<payload>`.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Encode as a JPEG data URL.
pub fn jpeg_data_url(img: &RgbaImage, quality: u8) -> BoothResult<String> {
    Ok(to_data_url(JPEG_MIME, &encode_jpeg(img, quality)?))
}

/// Extract the raw bytes of a base64 data URL.
pub fn decode_data_url(url: &str) -> BoothResult<Vec<u8>> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| BoothError::validation("image is not a data URL"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| BoothError::validation("data URL has no payload separator"))?;
    if !meta.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
        return Err(BoothError::validation("data URL is not base64-encoded"));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| BoothError::validation(format!("invalid base64 payload: {e}")))
}

/// Decode any supported raster format into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> BoothResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(dyn_img.to_rgba8())
}

/// Decode a data URL straight to pixels.
pub fn decode_data_url_image(url: &str) -> BoothResult<RgbaImage> {
    decode_image(&decode_data_url(url)?)
}

#[cfg(test)]
#[path = "../../tests/unit/strip/data_url.rs"]
mod tests;
