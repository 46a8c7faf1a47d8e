use image::{RgbaImage, imageops};

use crate::{
    filters::{FilterKind, apply_filter},
    foundation::{
        core::FacingMode,
        error::{BoothError, BoothResult},
    },
    strip::data_url::{FRAME_JPEG_QUALITY, jpeg_data_url},
};

/// One captured still, already filtered and encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Zero-based capture order.
    pub order: usize,
    /// Filter baked into the pixels.
    pub filter: FilterKind,
    /// JPEG data URL.
    pub data_url: String,
}

/// Centered square of side `min(width, height)`, mirrored for front-facing cameras.
pub fn square_crop(raw: &RgbaImage, facing: FacingMode) -> BoothResult<RgbaImage> {
    let (w, h) = raw.dimensions();
    let side = w.min(h);
    if side == 0 {
        return Err(BoothError::capture("camera frame has no pixels"));
    }
    let mut square = imageops::crop_imm(raw, (w - side) / 2, (h - side) / 2, side, side).to_image();
    if facing.mirrors() {
        imageops::flip_horizontal_in_place(&mut square);
    }
    Ok(square)
}

/// Turn a raw camera frame into a stored photo: crop, mirror, filter, encode at q90.
pub fn process_frame(
    raw: &RgbaImage,
    order: usize,
    facing: FacingMode,
    filter: FilterKind,
) -> BoothResult<Frame> {
    let mut square = square_crop(raw, facing)?;
    apply_filter(&mut square, filter);
    Ok(Frame {
        order,
        filter,
        data_url: jpeg_data_url(&square, FRAME_JPEG_QUALITY)?,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/capture/frame.rs"]
mod tests;
