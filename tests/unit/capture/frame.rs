use image::Rgba;

use super::*;
use crate::strip::data_url::decode_data_url_image;

fn columns(colors: &[[u8; 3]], height: u32) -> RgbaImage {
    RgbaImage::from_fn(colors.len() as u32, height, |x, _| {
        let [r, g, b] = colors[x as usize];
        Rgba([r, g, b, 255])
    })
}

#[test]
fn crops_centered_square_from_landscape() {
    let raw = columns(&[[1, 0, 0], [2, 0, 0], [3, 0, 0], [4, 0, 0]], 2);
    let sq = square_crop(&raw, FacingMode::Back).unwrap();
    assert_eq!(sq.dimensions(), (2, 2));
    assert_eq!(sq.get_pixel(0, 0).0[0], 2);
    assert_eq!(sq.get_pixel(1, 1).0[0], 3);
}

#[test]
fn front_camera_frames_are_mirrored() {
    let raw = columns(&[[1, 0, 0], [2, 0, 0], [3, 0, 0], [4, 0, 0]], 2);
    let sq = square_crop(&raw, FacingMode::Front).unwrap();
    assert_eq!(sq.get_pixel(0, 0).0[0], 3);
    assert_eq!(sq.get_pixel(1, 0).0[0], 2);
}

#[test]
fn crops_portrait_vertically() {
    let raw = RgbaImage::from_fn(2, 6, |_, y| Rgba([y as u8, 0, 0, 255]));
    let sq = square_crop(&raw, FacingMode::Back).unwrap();
    assert_eq!(sq.get_pixel(0, 0).0[0], 2);
    assert_eq!(sq.get_pixel(0, 1).0[0], 3);
}

#[test]
fn empty_frame_is_a_capture_error() {
    let err = square_crop(&RgbaImage::new(0, 10), FacingMode::Front).unwrap_err();
    assert!(matches!(err, BoothError::Capture(_)));
}

#[test]
fn processed_frame_is_square_jpeg() {
    let raw = RgbaImage::from_pixel(40, 30, Rgba([30, 200, 100, 255]));
    let frame = process_frame(&raw, 2, FacingMode::Front, FilterKind::BlackAndWhite).unwrap();
    assert_eq!(frame.order, 2);
    assert_eq!(frame.filter, FilterKind::BlackAndWhite);
    let decoded = decode_data_url_image(&frame.data_url).unwrap();
    assert_eq!(decoded.dimensions(), (30, 30));
    let px = decoded.get_pixel(15, 15).0;
    for c in &px[..3] {
        assert!((*c as i32 - 110).abs() <= 3, "{px:?}");
    }
}
