use super::*;
use crate::strip::data_url::{FRAME_JPEG_QUALITY, to_data_url};

fn photo(side: u32, rgb: [u8; 3]) -> String {
    let img = RgbaImage::from_pixel(side, side, image::Rgba([rgb[0], rgb[1], rgb[2], 255]));
    jpeg_data_url(&img, FRAME_JPEG_QUALITY).unwrap()
}

#[tokio::test]
async fn three_photos_produce_fixed_dimensions() {
    let photos = vec![
        photo(560, [200, 0, 0]),
        photo(560, [0, 200, 0]),
        photo(560, [0, 0, 200]),
    ];
    let url = compose_strip(&photos, &StripOptions::default()).await.unwrap();
    let strip = decode_data_url_image(&url).unwrap();
    assert_eq!(strip.width(), 560 + 2 * 36);
    assert_eq!(strip.height(), 36 + 3 * 560 + 2 * 12 + 36 + 52);
}

#[tokio::test]
async fn zero_photos_rejects() {
    let err = compose_strip(&[], &StripOptions::default()).await.unwrap_err();
    assert!(matches!(err, BoothError::Composition(_)));
}

#[tokio::test]
async fn one_bad_photo_fails_the_whole_strip() {
    let photos = vec![
        photo(32, [10, 10, 10]),
        to_data_url("image/jpeg", b"garbage"),
        photo(32, [20, 20, 20]),
    ];
    let err = compose_strip(&photos, &StripOptions::default()).await.unwrap_err();
    match err {
        BoothError::Composition(msg) => assert!(msg.contains("photo 2"), "{msg}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn photos_land_in_capture_order_and_are_scaled() {
    let layout = StripLayout {
        photo_size: 20,
        padding_h: 4,
        padding_top: 4,
        gap: 2,
        label_band: 0,
        padding_bottom: 4,
        label_font_px: 8.0,
    };
    let opts = StripOptions {
        date: None,
        background: Rgb8::new(255, 255, 255),
        text_color: Rgb8::new(0, 0, 0),
        layout,
    };
    let top = RgbaImage::from_pixel(10, 10, image::Rgba([255, 0, 0, 255]));
    let bottom = RgbaImage::from_pixel(20, 20, image::Rgba([0, 0, 255, 255]));

    let strip = render_strip(&[top, bottom], &opts).unwrap();
    assert_eq!(strip.dimensions(), (28, 4 + 40 + 2 + 4));
    assert_eq!(strip.get_pixel(14, 14).0, [255, 0, 0, 255]);
    assert_eq!(strip.get_pixel(14, 4 + 20 + 2 + 10).0, [0, 0, 255, 255]);
    assert_eq!(strip.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(strip.get_pixel(14, 4 + 20).0, [255, 255, 255, 255]);
}

#[test]
fn styled_options_follow_palette() {
    let opts = StripOptions::styled(StripStyle::Black, Some("1/2/2026".into()));
    assert_eq!(opts.background, StripStyle::Black.background());
    assert_eq!(opts.text_color, StripStyle::Black.text_color());
    assert_eq!(opts.layout, StripLayout::default());
}
