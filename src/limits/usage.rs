use std::sync::{Arc, Mutex};

use crate::{
    config::env::BoothConfig,
    foundation::error::{BoothError, BoothResult},
    storage::kv::KeyValueStore,
};

const COUNTER_PREFIX: &str = "pocketbooth.uploadCount";
const DEFAULT_BUCKET: &str = "default";

/// Uploads still allowed for a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Remaining {
    /// No quota applies.
    Unlimited,
    /// This many more successful uploads are allowed.
    Count(u32),
}

impl Remaining {
    /// Whether at least one more upload is allowed.
    pub fn allows_upload(self) -> bool {
        !matches!(self, Self::Count(0))
    }
}

impl std::fmt::Display for Remaining {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unlimited => f.write_str("unlimited"),
            Self::Count(n) => write!(f, "{n}"),
        }
    }
}

/// Counts successful uploads per configuration key against the key's quota.
///
/// Counters are durable and only ever grow; a failed upload never touches them.
pub struct UsageLimiter {
    kv: Arc<dyn KeyValueStore>,
    config: Arc<BoothConfig>,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for UsageLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageLimiter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl UsageLimiter {
    /// Bind to a durable store.
    pub fn new(kv: Arc<dyn KeyValueStore>, config: Arc<BoothConfig>) -> Self {
        Self {
            kv,
            config,
            write_lock: Mutex::new(()),
        }
    }

    /// Quota for `key`; `None` when unkeyed, unknown or unlimited.
    pub fn limit(&self, key: Option<&str>) -> Option<u32> {
        key.and_then(|k| self.config.key_config(k))
            .and_then(|c| c.photo_limit)
    }

    /// Successful uploads recorded for `key`.
    ///
    /// An unreadable counter is a storage error rather than zero, so a damaged store never
    /// hands quota back.
    pub fn used(&self, key: Option<&str>) -> BoothResult<u32> {
        let counter = counter_key(key);
        let Some(raw) = self.kv.get(&counter)? else {
            return Ok(0);
        };
        raw.trim().parse().map_err(|_| {
            tracing::error!(counter = counter.as_str(), value = raw.as_str(), "unreadable upload counter");
            BoothError::storage(format!("upload counter '{counter}' is unreadable: {raw:?}"))
        })
    }

    /// Uploads still allowed for `key`.
    pub fn remaining(&self, key: Option<&str>) -> BoothResult<Remaining> {
        match self.limit(key) {
            None => Ok(Remaining::Unlimited),
            Some(limit) => Ok(Remaining::Count(limit.saturating_sub(self.used(key)?))),
        }
    }

    /// Whether `key` has used up its quota.
    pub fn has_reached_limit(&self, key: Option<&str>) -> BoothResult<bool> {
        Ok(!self.remaining(key)?.allows_upload())
    }

    /// Count one successful upload; returns the new total.
    pub fn record_successful_upload(&self, key: Option<&str>) -> BoothResult<u32> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| BoothError::storage("usage counter lock poisoned"))?;
        let next = self.used(key)?.saturating_add(1);
        self.kv.set(&counter_key(key), &next.to_string())?;
        tracing::debug!(key, count = next, "upload recorded");
        Ok(next)
    }
}

fn counter_key(key: Option<&str>) -> String {
    let bucket = key
        .map(|k| k.trim().to_ascii_uppercase())
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| DEFAULT_BUCKET.to_string());
    format!("{COUNTER_PREFIX}.{bucket}")
}

#[cfg(test)]
#[path = "../../tests/unit/limits/usage.rs"]
mod tests;
