use super::*;

#[test]
fn reads_upload_url_and_key_buckets() {
    let cfg = BoothConfig::from_vars([
        ("POCKETBOOTH_UPLOAD_URL", "https://booth.example.com/"),
        ("POCKETBOOTH_CONFIG_WEDDING", "25"),
        ("POCKETBOOTH_CONFIG_party", ""),
        ("POCKETBOOTH_CONFIG_ZERO", "0"),
        ("UNRELATED", "1"),
    ]);
    assert_eq!(cfg.upload_url.as_deref(), Some("https://booth.example.com"));
    assert!(cfg.upload_configured());
    assert_eq!(cfg.key_config("wedding").unwrap().photo_limit, Some(25));
    assert_eq!(cfg.key_config("PARTY").unwrap().photo_limit, None);
    assert_eq!(cfg.key_config("zero").unwrap().photo_limit, None);
    assert!(cfg.key_config("unknown").is_none());
}

#[test]
fn malformed_limits_are_not_configurations() {
    let cfg = BoothConfig::from_vars([
        ("POCKETBOOTH_CONFIG_BAD", "lots"),
        ("POCKETBOOTH_CONFIG_NEG", "-3"),
    ]);
    assert!(cfg.key_config("bad").is_none());
    assert!(cfg.key_config("neg").is_none());
}

#[test]
fn missing_upload_url_disables_uploads() {
    let cfg = BoothConfig::from_vars([("POCKETBOOTH_UPLOAD_URL", "  ")]);
    assert!(!cfg.upload_configured());
}
