use std::collections::BTreeMap;

/// Environment variable naming the upload endpoint base URL.
pub const UPLOAD_URL_VAR: &str = "POCKETBOOTH_UPLOAD_URL";
/// Prefix of per-key configuration variables (`POCKETBOOTH_CONFIG_<KEY>`).
pub const CONFIG_VAR_PREFIX: &str = "POCKETBOOTH_CONFIG_";

/// Settings attached to one configuration key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyConfig {
    /// Upload quota; `None` means unlimited.
    pub photo_limit: Option<u32>,
}

/// Deployment configuration read once at startup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoothConfig {
    /// Base URL of the upload service; uploads are disabled when absent.
    pub upload_url: Option<String>,
    keys: BTreeMap<String, KeyConfig>,
}

impl BoothConfig {
    /// Read from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Read from explicit `(name, value)` pairs.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut out = Self::default();
        for (name, value) in vars {
            let (name, value) = (name.as_ref(), value.as_ref());
            if name == UPLOAD_URL_VAR {
                let url = value.trim().trim_end_matches('/');
                if !url.is_empty() {
                    out.upload_url = Some(url.to_string());
                }
                continue;
            }
            let Some(key) = name.strip_prefix(CONFIG_VAR_PREFIX) else {
                continue;
            };
            if key.is_empty() {
                continue;
            }
            match parse_photo_limit(value) {
                Some(photo_limit) => {
                    out.keys
                        .insert(key.to_ascii_uppercase(), KeyConfig { photo_limit });
                }
                None => tracing::error!(
                    var = name,
                    value,
                    "invalid key configuration; expected a non-negative number or empty for unlimited"
                ),
            }
        }
        out
    }

    /// Register a key programmatically.
    pub fn with_key(mut self, key: &str, photo_limit: Option<u32>) -> Self {
        self.keys.insert(
            key.to_ascii_uppercase(),
            KeyConfig {
                photo_limit: photo_limit.filter(|n| *n > 0),
            },
        );
        self
    }

    /// Set the upload endpoint.
    pub fn with_upload_url(mut self, url: impl Into<String>) -> Self {
        self.upload_url = Some(url.into());
        self
    }

    /// Configuration for `key`, matched case-insensitively.
    pub fn key_config(&self, key: &str) -> Option<KeyConfig> {
        self.keys.get(&key.trim().to_ascii_uppercase()).copied()
    }

    /// Whether uploads can be attempted at all.
    pub fn upload_configured(&self) -> bool {
        self.upload_url.is_some()
    }
}

/// `Some(None)` for unlimited, `Some(Some(n))` for a quota, `None` when malformed.
fn parse_photo_limit(raw: &str) -> Option<Option<u32>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(None);
    }
    let n: u32 = trimmed.parse().ok()?;
    Some(Some(n).filter(|n| *n > 0))
}

#[cfg(test)]
#[path = "../../tests/unit/config/env.rs"]
mod tests;
