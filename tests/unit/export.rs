use chrono::{TimeZone, Utc};
use image::{Rgba, RgbaImage};

use super::*;
use crate::{
    foundation::core::StripStyle,
    strip::data_url::{FRAME_JPEG_QUALITY, decode_image, jpeg_data_url},
};

fn strip(n: usize) -> PhotoStrip {
    let photo = jpeg_data_url(
        &RgbaImage::from_pixel(20, 20, Rgba([10, 120, 220, 255])),
        FRAME_JPEG_QUALITY,
    )
    .unwrap();
    let at = Utc.with_ymd_and_hms(2026, 1, 2, 9, 30, 0).unwrap();
    PhotoStrip::new(1234, vec![photo; n], &at, StripStyle::White)
}

#[test]
fn routes_follow_host_restrictions() {
    let ig = "Mozilla/5.0 (iPhone) AppleWebKit Instagram 300.0";
    assert_eq!(ExportRoute::detect(ig, false), ExportRoute::OpenElsewhere);
    assert_eq!(ExportRoute::detect(ig, true), ExportRoute::OpenElsewhere);
    assert_eq!(ExportRoute::detect("Mozilla/5.0 Chrome/120", true), ExportRoute::NewContext);
    assert_eq!(ExportRoute::detect("Mozilla/5.0 Chrome/120", false), ExportRoute::Direct);
}

#[tokio::test]
async fn direct_export_writes_strip_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let out = export_strip(&strip(2), ExportRoute::Direct, dir.path())
        .await
        .unwrap();
    let path = dir.path().join("photo-strip-1234.jpg");
    assert_eq!(out, Exported::Saved(path.clone()));
    let img = decode_image(&std::fs::read(path).unwrap()).unwrap();
    assert_eq!(img.dimensions(), (632, 36 + 2 * 560 + 12 + 88));
}

#[tokio::test]
async fn new_context_export_writes_a_page() {
    let dir = tempfile::tempdir().unwrap();
    let out = export_strip(&strip(1), ExportRoute::NewContext, dir.path())
        .await
        .unwrap();
    let Exported::Saved(path) = out else {
        panic!("expected a saved page");
    };
    let html = std::fs::read_to_string(path).unwrap();
    assert!(html.contains(r#"download="photo-strip-1234.jpg""#));
    assert!(html.contains("data:image/jpeg;base64,"));
}

#[tokio::test]
async fn open_elsewhere_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = export_strip(&strip(1), ExportRoute::OpenElsewhere, dir.path())
        .await
        .unwrap();
    assert_eq!(out, Exported::OpenElsewhere(OPEN_ELSEWHERE_INSTRUCTIONS));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
