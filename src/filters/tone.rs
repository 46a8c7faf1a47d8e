//! Per-pixel tone curves. Each function maps one straight RGB triple to another and clamps on
//! commit; intermediate arithmetic is unclamped `f32`.

/// Sepia matrix rows, applied as `out = row · [r, g, b]`.
const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

pub(crate) fn clamp_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

fn sepia(r: f32, g: f32, b: f32) -> [f32; 3] {
    SEPIA.map(|row| r * row[0] + g * row[1] + b * row[2])
}

fn contrast(v: f32, factor: f32) -> f32 {
    (v - 128.0) * factor + 128.0
}

/// Unweighted channel mean.
pub fn black_and_white(px: [u8; 3]) -> [u8; 3] {
    let avg = (f32::from(px[0]) + f32::from(px[1]) + f32::from(px[2])) / 3.0;
    let v = clamp_u8(avg);
    [v, v, v]
}

/// Brighten, warm pink tint, 15% sepia blend and a slight contrast reduction.
pub fn cute(px: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = px.map(f32::from);

    let (r, g, b) = (r * 1.15, g * 1.15, b * 1.15);
    let (r, g, b) = (r * 1.08, g * 0.98, b * 1.02);

    let sep = sepia(r, g, b);
    let mixed = [
        sep[0] * 0.15 + r * 0.85,
        sep[1] * 0.15 + g * 0.85,
        sep[2] * 0.15 + b * 0.85,
    ];

    mixed.map(|v| clamp_u8(contrast(v, 0.95)))
}

/// Full sepia, green shift, +20% saturation around luma and a small contrast boost.
pub fn film(px: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = px.map(f32::from);
    let [sr, sg, sb] = sepia(r, g, b);

    let (fr, fg, fb) = (sr * 0.85, sg * 1.15, sb * 0.90);

    let gray = 0.2989 * fr + 0.5870 * fg + 0.1140 * fb;
    let saturated = [
        gray + (fr - gray) * 1.2,
        gray + (fg - gray) * 1.2,
        gray + (fb - gray) * 1.2,
    ];

    saturated.map(|v| clamp_u8(contrast(v, 1.05)))
}

/// Add the same signed delta to all three channels.
pub fn grain(px: [u8; 3], delta: f32) -> [u8; 3] {
    px.map(|c| clamp_u8(f32::from(c) + delta))
}

#[cfg(test)]
#[path = "../../tests/unit/filters/tone.rs"]
mod tests;
