use crate::{
    config::session::SessionConfig,
    limits::usage::UsageLimiter,
    storage::strips::PhotoStrip,
    strip::compose::StripOptions,
    upload::gateway::{UploadGateway, UploadOutcome},
};

/// Whether the upload action is offered at all; only key-based sessions upload.
pub fn show_upload(session: &SessionConfig) -> bool {
    session.is_key_based()
}

/// Upload a saved strip on behalf of the session, enforcing its quota.
///
/// The limit is checked before any network traffic and the counter moves only after the
/// endpoint confirms success. Nothing here retries.
#[tracing::instrument(skip_all, fields(strip = strip.id, key = session.key.as_deref()))]
pub async fn upload_strip(
    gateway: &UploadGateway,
    limiter: &UsageLimiter,
    session: &SessionConfig,
    strip: &PhotoStrip,
) -> UploadOutcome {
    let key = session.key.as_deref();
    match limiter.has_reached_limit(key) {
        Ok(false) => {}
        Ok(true) => {
            let limit = limiter.limit(key).unwrap_or_default();
            tracing::info!(limit, "upload limit reached");
            return UploadOutcome::failure(format!(
                "Upload limit reached ({limit} photos). No more uploads are available for this session."
            ));
        }
        Err(e) => return UploadOutcome::failure(e.user_message()),
    }

    let opts = StripOptions::styled(strip.style, Some(strip.date.clone()));
    let outcome = gateway
        .upload(&strip.photos, &strip.file_name(), key, &opts)
        .await;

    if outcome.success {
        if let Err(e) = limiter.record_successful_upload(key) {
            tracing::error!(error = %e, "upload succeeded but the usage counter could not be updated");
        }
    }
    outcome
}

#[cfg(test)]
#[path = "../../tests/unit/upload/flow.rs"]
mod tests;
