use std::sync::Mutex;

use super::*;
use crate::strip::data_url::{FRAME_JPEG_QUALITY, jpeg_data_url};

struct ScriptedTransport {
    reply: BoothResult<TransportResponse>,
    seen: Mutex<Vec<(String, UploadRequest)>>,
}

impl ScriptedTransport {
    fn replying(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(TransportResponse {
                status,
                body: body.to_string(),
            }),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing(msg: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(BoothError::upload(msg)),
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl UploadTransport for ScriptedTransport {
    async fn post_json(
        &self,
        url: &str,
        request: &UploadRequest,
    ) -> BoothResult<TransportResponse> {
        self.seen
            .lock()
            .unwrap()
            .push((url.to_string(), request.clone()));
        match &self.reply {
            Ok(r) => Ok(r.clone()),
            Err(e) => Err(BoothError::upload(e.user_message())),
        }
    }
}

fn photo() -> String {
    let img = image::RgbaImage::from_pixel(16, 16, image::Rgba([200, 120, 80, 255]));
    jpeg_data_url(&img, FRAME_JPEG_QUALITY).unwrap()
}

#[test]
fn file_name_replaces_extension() {
    assert_eq!(upload_file_name("photo-strip-1.png"), "photo-strip-1.jpg");
    assert_eq!(upload_file_name("photo-strip-1"), "photo-strip-1.jpg");
    assert_eq!(upload_file_name("a.b.jpeg"), "a.b.jpg");
    assert_eq!(upload_file_name("dir.v2/strip"), "dir.v2/strip.jpg");
}

#[test]
fn request_omits_absent_key() {
    let body = serde_json::to_value(UploadRequest {
        image: "data:".into(),
        filename: "x.jpg".into(),
        key: None,
    })
    .unwrap();
    assert!(body.get("key").is_none());
    assert_eq!(body["filename"], "x.jpg");
}

#[tokio::test]
async fn successful_upload_posts_strip_and_returns_details() {
    let transport = ScriptedTransport::replying(
        200,
        r#"{"success":true,"file_id":"abc","file_name":"s.jpg","web_view_link":"https://v/abc"}"#,
    );
    let gw = UploadGateway::new(Some("https://booth.test/".into()), transport.clone());
    let out = gw
        .upload(&[photo(), photo()], "photo-strip-7.jpg", Some("EVENT"), &StripOptions::default())
        .await;
    assert!(out.success);
    assert_eq!(out.file_id.as_deref(), Some("abc"));
    assert_eq!(out.web_view_link.as_deref(), Some("https://v/abc"));

    let seen = transport.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "https://booth.test/api/upload");
    assert_eq!(seen[0].1.filename, "photo-strip-7.jpg");
    assert_eq!(seen[0].1.key.as_deref(), Some("EVENT"));
    assert!(seen[0].1.image.starts_with("data:image/jpeg;base64,"));
}

#[tokio::test]
async fn error_status_surfaces_backend_message() {
    let transport = ScriptedTransport::replying(403, r#"{"success":false,"error":"quota exhausted"}"#);
    let gw = UploadGateway::new(Some("https://booth.test".into()), transport);
    let out = gw.upload_image(photo(), "x.jpg", None).await;
    assert!(!out.success);
    assert_eq!(out.error.as_deref(), Some("quota exhausted"));
}

#[tokio::test]
async fn success_flag_false_is_a_failure_even_with_ok_status() {
    let transport = ScriptedTransport::replying(200, r#"{"success":false}"#);
    let gw = UploadGateway::new(Some("https://booth.test".into()), transport);
    let out = gw.upload_image(photo(), "x.jpg", None).await;
    assert!(!out.success);
    assert_eq!(out.error.as_deref(), Some("Upload failed (HTTP 200)"));
}

#[tokio::test]
async fn non_json_reply_and_transport_errors_become_failures() {
    let gw = UploadGateway::new(
        Some("https://booth.test".into()),
        ScriptedTransport::replying(502, "<html>bad gateway</html>"),
    );
    let out = gw.upload_image(photo(), "x.jpg", None).await;
    assert_eq!(out.error.as_deref(), Some("Upload failed (HTTP 502)"));

    let gw = UploadGateway::new(
        Some("https://booth.test".into()),
        ScriptedTransport::failing("connection refused"),
    );
    let out = gw.upload_image(photo(), "x.jpg", None).await;
    assert!(!out.success);
    assert!(out.error.unwrap().contains("connection refused"));
}

#[tokio::test]
async fn unconfigured_gateway_never_touches_transport() {
    let transport = ScriptedTransport::replying(200, r#"{"success":true}"#);
    let gw = UploadGateway::new(None, transport.clone());
    let out = gw
        .upload(&[photo()], "s.jpg", None, &StripOptions::default())
        .await;
    assert_eq!(
        out.error.as_deref(),
        Some("Upload not configured. Set POCKETBOOTH_UPLOAD_URL.")
    );
    assert!(transport.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn undecodable_photo_fails_before_network() {
    let transport = ScriptedTransport::replying(200, r#"{"success":true}"#);
    let gw = UploadGateway::new(Some("https://booth.test".into()), transport.clone());
    let out = gw
        .upload(&["data:image/jpeg;base64,AAAA".to_string()], "s.jpg", None, &StripOptions::default())
        .await;
    assert!(!out.success);
    assert!(transport.seen.lock().unwrap().is_empty());
}
