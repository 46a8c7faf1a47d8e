use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use chrono::{DateTime, Local, TimeZone};

use crate::{
    foundation::{
        core::StripStyle,
        error::{BoothError, BoothResult},
    },
    storage::kv::KeyValueStore,
};

/// Storage key holding the serialized strip collection.
pub const STRIPS_KEY: &str = "photoStrips";

/// A finished photo strip as persisted.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PhotoStrip {
    /// Unique, time-derived identifier.
    pub id: u64,
    /// Encoded photos (JPEG data URLs) in capture order, filter already applied.
    pub photos: Vec<String>,
    /// Creation time of day, e.g. `3:04:05 PM`.
    pub timestamp: String,
    /// Creation date, e.g. `3/14/2026`.
    pub date: String,
    /// Display style chosen when the strip was made.
    #[serde(default)]
    pub style: StripStyle,
}

impl PhotoStrip {
    /// Build a strip stamped with `created`.
    pub fn new<Tz: TimeZone>(
        id: u64,
        photos: Vec<String>,
        created: &DateTime<Tz>,
        style: StripStyle,
    ) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            id,
            photos,
            timestamp: created.format("%-I:%M:%S %p").to_string(),
            date: created.format("%-m/%-d/%Y").to_string(),
            style,
        }
    }

    /// Build a strip stamped with the local clock.
    pub fn now(id: u64, photos: Vec<String>, style: StripStyle) -> Self {
        Self::new(id, photos, &Local::now(), style)
    }

    /// Suggested download file name.
    pub fn file_name(&self) -> String {
        format!("photo-strip-{}.jpg", self.id)
    }
}

/// Durable, ordered collection of strips. The only writer of [`STRIPS_KEY`].
///
/// Identifiers are wall-clock milliseconds bumped to stay strictly increasing within this
/// process. A strip appended with an identifier that already exists replaces the stored one in
/// place (last write wins) and logs a warning.
pub struct StripStore {
    kv: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
    last_id: AtomicU64,
}

impl std::fmt::Debug for StripStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripStore")
            .field("last_id", &self.last_id.load(Ordering::Relaxed))
            .finish()
    }
}

impl StripStore {
    /// Wrap a key-value backend.
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        let store = Self {
            kv,
            write_lock: Mutex::new(()),
            last_id: AtomicU64::new(0),
        };
        match store.list() {
            Ok(strips) => {
                let max = strips.iter().map(|s| s.id).max().unwrap_or(0);
                store.last_id.store(max, Ordering::Relaxed);
            }
            Err(e) => tracing::warn!(error = %e, "strip collection unreadable at startup"),
        }
        store
    }

    /// Next identifier: current epoch millis, or one past the last issued id if the clock has not
    /// moved.
    pub fn next_id(&self) -> u64 {
        let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
        let prev = self
            .last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last.saturating_add(1)))
            })
            .unwrap_or(now);
        now.max(prev.saturating_add(1))
    }

    /// All strips in creation order.
    pub fn list(&self) -> BoothResult<Vec<PhotoStrip>> {
        match self.kv.get(STRIPS_KEY)? {
            None => Ok(Vec::new()),
            Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| BoothError::serde(format!("stored strips are unreadable: {e}"))),
        }
    }

    /// Look a strip up by id.
    pub fn get(&self, id: u64) -> BoothResult<Option<PhotoStrip>> {
        Ok(self.list()?.into_iter().find(|s| s.id == id))
    }

    /// Add a strip at the end of the collection.
    pub fn append(&self, strip: PhotoStrip) -> BoothResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| BoothError::storage("strip store lock poisoned"))?;
        let mut strips = self.list()?;
        self.last_id.fetch_max(strip.id, Ordering::SeqCst);

        if let Some(existing) = strips.iter_mut().find(|s| s.id == strip.id) {
            tracing::warn!(id = strip.id, "strip id collision; replacing stored strip");
            *existing = strip;
        } else {
            tracing::info!(id = strip.id, photos = strip.photos.len(), "strip saved");
            strips.push(strip);
        }
        self.save(&strips)
    }

    /// Permanently delete one strip. Returns whether it existed.
    pub fn remove(&self, id: u64) -> BoothResult<bool> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| BoothError::storage("strip store lock poisoned"))?;
        let mut strips = self.list()?;
        let before = strips.len();
        strips.retain(|s| s.id != id);
        if strips.len() == before {
            return Ok(false);
        }
        self.save(&strips)?;
        tracing::info!(id, "strip deleted");
        Ok(true)
    }

    fn save(&self, strips: &[PhotoStrip]) -> BoothResult<()> {
        let raw = serde_json::to_string(strips)?;
        self.kv.set(STRIPS_KEY, &raw)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storage/strips.rs"]
mod tests;
