use super::*;

#[test]
fn transparent_source_is_noop() {
    assert_eq!(over([10, 20, 30, 255], [255, 255, 255, 0]), [10, 20, 30, 255]);
}

#[test]
fn opaque_source_replaces() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255]), [255, 0, 0, 255]);
}

#[test]
fn half_alpha_mixes_with_opaque_background() {
    // 50% black text (premultiplied) over white.
    let out = over([255, 255, 255, 255], [0, 0, 0, 128]);
    assert_eq!(out[3], 255);
    assert!((i16::from(out[0]) - 127).abs() <= 1);
}

#[test]
fn region_must_fit() {
    let mut img = RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255]));
    assert!(over_region(&mut img, &[0u8; 16], 3, 0, 2, 2).is_err());
    assert!(over_region(&mut img, &[0u8; 12], 0, 0, 2, 2).is_err());

    let red = [255u8, 0, 0, 255].repeat(4);
    over_region(&mut img, &red, 2, 2, 2, 2).unwrap();
    assert_eq!(img.get_pixel(3, 3).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(1, 1).0, [0, 0, 0, 255]);
}
