use std::sync::Arc;

use reqwest::Url;

use crate::{
    config::env::BoothConfig,
    foundation::error::{BoothError, BoothResult},
    storage::kv::KeyValueStore,
};

const SESSION_KEY: &str = "pocketbooth.configKey";
const SESSION_BASE_URL: &str = "pocketbooth.baseUrl";

/// Effective configuration for the current session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// The active configuration key, if one was supplied and recognised.
    pub key: Option<String>,
    /// Upload quota for the key; `None` means unlimited.
    pub photo_limit: Option<u32>,
}

impl SessionConfig {
    /// Whether the session runs under a configuration key.
    pub fn is_key_based(&self) -> bool {
        self.key.is_some()
    }
}

/// Resolves the configuration key for a session from its entry URL.
///
/// The key lives in session-scoped storage, so it survives in-page navigation but is dropped
/// when the session lands on a different origin or path.
pub struct ConfigSession {
    session: Arc<dyn KeyValueStore>,
    config: Arc<BoothConfig>,
}

impl std::fmt::Debug for ConfigSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigSession")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ConfigSession {
    /// Bind to a session store.
    pub fn new(session: Arc<dyn KeyValueStore>, config: Arc<BoothConfig>) -> Self {
        Self { session, config }
    }

    /// Inspect `url` for a `key` query parameter and update the stored key.
    #[tracing::instrument(skip(self))]
    pub fn initialize_from_url(&self, url: &str) -> BoothResult<()> {
        let parsed = Url::parse(url.trim())
            .map_err(|e| BoothError::validation(format!("invalid page URL '{url}': {e}")))?;
        let base = base_url(&parsed);
        let previous_base = self.session.get(SESSION_BASE_URL)?;
        if previous_base.as_deref().is_some_and(|prev| prev != base) {
            tracing::debug!(previous = previous_base.as_deref(), "base URL changed; clearing key");
            self.session.remove(SESSION_KEY)?;
        }
        self.session.set(SESSION_BASE_URL, &base)?;

        match query_param(&parsed, "key") {
            Some(key) => self.apply_key(&key).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Activate `key` for this session when the deployment knows it.
    ///
    /// An unknown key is logged and clears any stored key; the session then runs unkeyed.
    /// Returns whether the key was accepted. A blank key is ignored.
    pub fn apply_key(&self, key: &str) -> BoothResult<bool> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(false);
        }
        if self.config.key_config(key).is_some() {
            tracing::info!(key, "configuration key active");
            self.session.set(SESSION_KEY, key)?;
            Ok(true)
        } else {
            tracing::warn!(key, "unknown configuration key; ignoring");
            self.session.remove(SESSION_KEY)?;
            Ok(false)
        }
    }

    /// The stored key, if it still maps to a configuration.
    pub fn current_key(&self) -> BoothResult<Option<String>> {
        Ok(self
            .session
            .get(SESSION_KEY)?
            .filter(|k| self.config.key_config(k).is_some()))
    }

    /// Whether a recognised key is active.
    pub fn is_key_based(&self) -> BoothResult<bool> {
        Ok(self.current_key()?.is_some())
    }

    /// Key plus its quota.
    pub fn session_config(&self) -> BoothResult<SessionConfig> {
        let key = self.current_key()?;
        let photo_limit = key
            .as_deref()
            .and_then(|k| self.config.key_config(k))
            .and_then(|c| c.photo_limit);
        Ok(SessionConfig { key, photo_limit })
    }

    /// Forget the stored key.
    pub fn clear_key(&self) -> BoothResult<()> {
        self.session.remove(SESSION_KEY)
    }

    /// Deployment configuration this session resolves against.
    pub fn config(&self) -> &BoothConfig {
        &self.config
    }
}

/// Origin plus path, the part of a page address that identifies the page.
fn base_url(url: &Url) -> String {
    format!("{}{}", url.origin().ascii_serialization(), url.path())
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

#[cfg(test)]
#[path = "../../tests/unit/config/session.rs"]
mod tests;
