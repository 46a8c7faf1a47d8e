use super::*;

#[test]
fn jpeg_data_url_decodes_back_to_same_dimensions() {
    let img = RgbaImage::from_pixel(12, 8, image::Rgba([200, 40, 90, 255]));
    let url = jpeg_data_url(&img, FRAME_JPEG_QUALITY).unwrap();
    assert!(url.starts_with("data:image/jpeg;base64,"));

    let back = decode_data_url_image(&url).unwrap();
    assert_eq!(back.dimensions(), (12, 8));
    let px = back.get_pixel(6, 4);
    assert!((i16::from(px[0]) - 200).abs() <= 6);
}

#[test]
fn decode_rejects_non_data_urls() {
    assert!(decode_data_url("https://example.com/a.jpg").is_err());
    assert!(decode_data_url("data:image/jpeg;base64").is_err());
    assert!(decode_data_url("data:text/plain,hello").is_err());
    assert!(decode_data_url("data:image/jpeg;base64,!!!").is_err());
}

#[test]
fn undecodable_bytes_are_errors() {
    let url = to_data_url(JPEG_MIME, b"definitely not a jpeg");
    assert!(decode_data_url_image(&url).is_err());
}
