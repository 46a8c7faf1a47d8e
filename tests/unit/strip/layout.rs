use super::*;

#[test]
fn three_photo_strip_dimensions() {
    let layout = StripLayout::default();
    let (w, h) = layout.canvas_size(3).unwrap();
    assert_eq!(w, 560 + 2 * 36);
    assert_eq!(h, 36 + 3 * 560 + 2 * 12 + 36 + 52);
}

#[test]
fn single_photo_has_no_gap() {
    let (_, h) = StripLayout::default().canvas_size(1).unwrap();
    assert_eq!(h, 36 + 560 + 52 + 36);
}

#[test]
fn empty_layout_is_rejected() {
    assert!(StripLayout::default().canvas_size(0).is_err());
}

#[test]
fn photo_origins_stack_with_gap() {
    let layout = StripLayout::default();
    assert_eq!(layout.photo_origin(0), (36, 36));
    assert_eq!(layout.photo_origin(2), (36, 36 + 2 * (560 + 12)));
    assert_eq!(layout.label_top(2), 36 + 2 * 560 + 12);
}

#[test]
fn label_text() {
    assert_eq!(strip_label(Some("3/14/2026")), "POCKET BOOTH · 3/14/2026");
    assert_eq!(strip_label(Some("   ")), "POCKET BOOTH");
    assert_eq!(strip_label(None), "POCKET BOOTH");
}

#[test]
fn layouts_compare_by_value_including_font_size() {
    let layout = StripLayout::default();
    assert_eq!(layout, StripLayout::default());
    let larger = StripLayout {
        label_font_px: 24.0,
        ..layout
    };
    assert_ne!(layout, larger);
}
