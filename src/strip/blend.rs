use image::RgbaImage;

use crate::foundation::error::{BoothError, BoothResult};

/// Premultiplied source-over for one pixel.
pub fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = u16::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }
    let inv = 255u16 - sa;
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Composite a premultiplied `w * h` buffer onto an opaque image at `(x, y)`.
///
/// The destination is opaque, so its straight and premultiplied forms coincide.
pub fn over_region(
    dst: &mut RgbaImage,
    src_premul: &[u8],
    x: u32,
    y: u32,
    w: u32,
    h: u32,
) -> BoothResult<()> {
    if src_premul.len() != (w as usize) * (h as usize) * 4 {
        return Err(BoothError::validation(
            "over_region expects src matching w*h*4",
        ));
    }
    if x.saturating_add(w) > dst.width() || y.saturating_add(h) > dst.height() {
        return Err(BoothError::validation("over_region source exceeds destination"));
    }
    for (i, s) in src_premul.chunks_exact(4).enumerate() {
        let (sx, sy) = ((i as u32) % w, (i as u32) / w);
        let d = dst.get_pixel_mut(x + sx, y + sy);
        d.0 = over(d.0, [s[0], s[1], s[2], s[3]]);
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/strip/blend.rs"]
mod tests;
