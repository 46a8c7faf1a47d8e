use std::{str::FromStr, sync::Arc};

use crate::{
    filters::FilterKind,
    foundation::{
        core::{FacingMode, ShotCount, StripStyle},
        error::BoothResult,
    },
    storage::kv::KeyValueStore,
};

const FILTER_KEY: &str = "pocketbooth.filter";
const SHOT_COUNT_KEY: &str = "pocketbooth.photoCount";
const FACING_KEY: &str = "pocketbooth.facingMode";
const STYLE_KEY: &str = "pocketbooth.stripStyle";

/// User choices that shape the next capture session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Preferences {
    filter: FilterKind,
    shot_count: ShotCount,
    facing: FacingMode,
    style: StripStyle,
}

impl Preferences {
    /// Active filter.
    pub fn filter(&self) -> FilterKind {
        self.filter
    }

    /// Photos per strip.
    pub fn shot_count(&self) -> ShotCount {
        self.shot_count
    }

    /// Requested camera.
    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    /// Strip colour scheme.
    pub fn style(&self) -> StripStyle {
        self.style
    }

    /// Select a filter.
    pub fn set_filter(&mut self, filter: FilterKind) {
        self.filter = filter;
    }

    /// Select the shot count; out-of-range values are clamped into 1..=4.
    pub fn set_shot_count(&mut self, n: u32) -> ShotCount {
        self.shot_count = ShotCount::clamped(n);
        self.shot_count
    }

    /// Select the camera.
    pub fn set_facing(&mut self, facing: FacingMode) {
        self.facing = facing;
    }

    /// Select the strip colour scheme.
    pub fn set_style(&mut self, style: StripStyle) {
        self.style = style;
    }
}

/// Persists [`Preferences`] one field per key.
pub struct PreferenceStore {
    kv: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore").finish_non_exhaustive()
    }
}

impl PreferenceStore {
    /// Bind to a durable store.
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load saved preferences; each missing or unreadable field falls back to its default.
    pub fn load(&self) -> BoothResult<Preferences> {
        let mut prefs = Preferences::default();
        if let Some(f) = self.field::<FilterKind>(FILTER_KEY)? {
            prefs.set_filter(f);
        }
        if let Some(n) = self.field::<u32>(SHOT_COUNT_KEY)? {
            prefs.set_shot_count(n);
        }
        if let Some(m) = self.field::<FacingMode>(FACING_KEY)? {
            prefs.set_facing(m);
        }
        if let Some(s) = self.field::<StripStyle>(STYLE_KEY)? {
            prefs.set_style(s);
        }
        Ok(prefs)
    }

    /// Persist every field.
    pub fn save(&self, prefs: &Preferences) -> BoothResult<()> {
        self.kv.set(FILTER_KEY, prefs.filter.id())?;
        self.kv
            .set(SHOT_COUNT_KEY, &prefs.shot_count.get().to_string())?;
        self.kv.set(FACING_KEY, prefs.facing.as_str())?;
        self.kv.set(STYLE_KEY, prefs.style.as_str())
    }

    fn field<T: FromStr>(&self, key: &str) -> BoothResult<Option<T>> {
        let Some(raw) = self.kv.get(key)? else {
            return Ok(None);
        };
        match raw.trim().parse() {
            Ok(v) => Ok(Some(v)),
            Err(_) => {
                tracing::warn!(key, value = raw.as_str(), "ignoring unreadable preference");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/prefs.rs"]
mod tests;
