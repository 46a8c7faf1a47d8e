use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use chrono::{TimeZone, Utc};

use super::*;
use crate::{
    config::env::BoothConfig,
    foundation::{core::StripStyle, error::BoothResult},
    storage::kv::{KeyValueStore, MemoryStore},
    strip::data_url::{FRAME_JPEG_QUALITY, jpeg_data_url},
    upload::gateway::{TransportResponse, UploadRequest, UploadTransport},
};

/// Replies with the queued statuses in order, then keeps repeating the last one.
struct QueuedTransport {
    statuses: Mutex<Vec<u16>>,
    calls: AtomicUsize,
}

impl QueuedTransport {
    fn new(statuses: &[u16]) -> Arc<Self> {
        Arc::new(Self {
            statuses: Mutex::new(statuses.iter().rev().copied().collect()),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait::async_trait]
impl UploadTransport for QueuedTransport {
    async fn post_json(&self, _: &str, _: &UploadRequest) -> BoothResult<TransportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut q = self.statuses.lock().unwrap();
        let status = if q.len() > 1 { q.pop().unwrap() } else { q[0] };
        let body = if status == 200 {
            r#"{"success":true,"file_id":"f1"}"#
        } else {
            r#"{"success":false,"error":"backend down"}"#
        };
        Ok(TransportResponse {
            status,
            body: body.to_string(),
        })
    }
}

fn strip() -> PhotoStrip {
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([90, 90, 90, 255]));
    let photo = jpeg_data_url(&img, FRAME_JPEG_QUALITY).unwrap();
    let at = Utc.with_ymd_and_hms(2026, 3, 14, 15, 4, 5).unwrap();
    PhotoStrip::new(42, vec![photo], &at, StripStyle::Black)
}

fn fixture(limit: Option<u32>, statuses: &[u16]) -> (Arc<QueuedTransport>, UploadGateway, UsageLimiter) {
    let config = Arc::new(BoothConfig::default().with_key("EVENT", limit));
    let transport = QueuedTransport::new(statuses);
    let gateway = UploadGateway::new(Some("https://booth.test".into()), transport.clone());
    let limiter = UsageLimiter::new(Arc::new(MemoryStore::new()), config);
    (transport, gateway, limiter)
}

fn keyed() -> SessionConfig {
    SessionConfig {
        key: Some("EVENT".into()),
        photo_limit: Some(5),
    }
}

#[tokio::test]
async fn failures_never_consume_quota() {
    let (transport, gateway, limiter) = fixture(Some(5), &[500, 500, 500, 200]);
    let s = strip();
    for _ in 0..3 {
        let out = upload_strip(&gateway, &limiter, &keyed(), &s).await;
        assert!(!out.success);
        assert_eq!(out.error.as_deref(), Some("backend down"));
    }
    assert_eq!(limiter.used(Some("EVENT")).unwrap(), 0);

    let out = upload_strip(&gateway, &limiter, &keyed(), &s).await;
    assert!(out.success);
    assert_eq!(limiter.used(Some("EVENT")).unwrap(), 1);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn exhausted_quota_blocks_before_network() {
    let (transport, gateway, limiter) = fixture(Some(1), &[200]);
    let s = strip();
    assert!(upload_strip(&gateway, &limiter, &keyed(), &s).await.success);

    let out = upload_strip(&gateway, &limiter, &keyed(), &s).await;
    assert!(!out.success);
    assert!(out.error.unwrap().starts_with("Upload limit reached (1 photos)"));
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    assert_eq!(limiter.used(Some("EVENT")).unwrap(), 1);
}

#[test]
fn upload_offered_only_for_key_sessions() {
    assert!(show_upload(&keyed()));
    assert!(!show_upload(&SessionConfig::default()));
}

#[tokio::test]
async fn unreadable_counter_blocks_before_network() {
    let kv = Arc::new(MemoryStore::new());
    kv.set("pocketbooth.uploadCount.EVENT", "??").unwrap();
    let config = Arc::new(BoothConfig::default().with_key("EVENT", Some(5)));
    let transport = QueuedTransport::new(&[200]);
    let gateway = UploadGateway::new(Some("https://booth.test".into()), transport.clone());
    let limiter = UsageLimiter::new(kv, config);

    let out = upload_strip(&gateway, &limiter, &keyed(), &strip()).await;
    assert!(!out.success);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
}
