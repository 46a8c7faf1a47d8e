use super::*;

#[test]
fn shot_count_clamps_into_range() {
    assert_eq!(ShotCount::clamped(0).get(), 1);
    assert_eq!(ShotCount::clamped(3).get(), 3);
    assert_eq!(ShotCount::clamped(9).get(), 4);
    assert!(ShotCount::new(0).is_err());
    assert!(ShotCount::new(5).is_err());
    assert_eq!(ShotCount::new(2).unwrap().get(), 2);
}

#[test]
fn shot_count_deserialize_clamps() {
    let n: ShotCount = serde_json::from_str("12").unwrap();
    assert_eq!(n.get(), 4);
}

#[test]
fn facing_mode_parses_media_device_aliases() {
    assert_eq!("user".parse::<FacingMode>().unwrap(), FacingMode::Front);
    assert_eq!("environment".parse::<FacingMode>().unwrap(), FacingMode::Back);
    assert!("sideways".parse::<FacingMode>().is_err());
    assert!(FacingMode::Front.mirrors());
    assert!(!FacingMode::Back.mirrors());
    assert_eq!(FacingMode::Front.flipped(), FacingMode::Back);
}

#[test]
fn hex_colors_roundtrip() {
    let c = Rgb8::from_hex("#1c1510").unwrap();
    assert_eq!(c, Rgb8::new(0x1c, 0x15, 0x10));
    assert_eq!(c.to_hex(), "#1c1510");
    assert!(Rgb8::from_hex("#12345").is_err());
    assert!(Rgb8::from_hex("zzzzzz").is_err());
}

#[test]
fn strip_styles_cycle_and_carry_palette() {
    assert_eq!(StripStyle::White.next(), StripStyle::Black);
    assert_eq!(StripStyle::Black.next(), StripStyle::White);
    assert_eq!(StripStyle::White.text_color().to_hex(), "#8b7d6e");
    assert_eq!(StripStyle::Black.background().to_hex(), "#1c1510");
}
