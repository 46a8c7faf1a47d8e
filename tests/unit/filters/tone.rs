use super::*;

#[test]
fn black_and_white_is_unweighted_mean() {
    assert_eq!(black_and_white([30, 200, 100]), [110, 110, 110]);
    assert_eq!(black_and_white([0, 0, 0]), [0, 0, 0]);
    assert_eq!(black_and_white([255, 255, 255]), [255, 255, 255]);
}

#[test]
fn cute_brightens_and_warms_mid_gray() {
    let [r, g, b] = cute([128, 128, 128]);
    assert!(r > 128, "red should rise, got {r}");
    assert!(r > g, "red should dominate green, got {r} vs {g}");
    assert!(r > b);
}

#[test]
fn cute_saturates_white_without_wrapping() {
    assert_eq!(cute([255, 255, 255])[0], 255);
}

#[test]
fn film_tints_green() {
    let [r, g, b] = film([128, 128, 128]);
    assert!(g > r, "green should dominate red, got {g} vs {r}");
    assert!(g > b);
}

#[test]
fn grain_clamps_both_directions() {
    assert_eq!(grain([250, 10, 128], 20.0), [255, 30, 148]);
    assert_eq!(grain([250, 10, 128], -20.0), [230, 0, 108]);
}

#[test]
fn clamp_handles_nan_and_extremes() {
    assert_eq!(clamp_u8(f32::NAN), 0);
    assert_eq!(clamp_u8(-3.0), 0);
    assert_eq!(clamp_u8(300.0), 255);
    assert_eq!(clamp_u8(127.5), 128);
}
