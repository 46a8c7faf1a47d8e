use std::time::Duration;

/// Pacing of a capture session.
///
/// Defaults: 3 s countdown, 500 ms settle before each shot, 2 s between shots, 150 ms flash,
/// 750 ms before the results view, 15 s camera acquisition timeout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptureTiming {
    /// Countdown start value; one tick per second.
    pub countdown_secs: u32,
    /// Wait before each shot.
    pub pre_shot_ms: u64,
    /// Wait after each shot.
    pub post_shot_ms: u64,
    /// Length of the flash cue.
    pub flash_ms: u64,
    /// Delay between completion and the results-ready signal.
    pub results_delay_ms: u64,
    /// Hard limit on camera acquisition.
    pub acquire_timeout_ms: u64,
}

impl Default for CaptureTiming {
    fn default() -> Self {
        Self {
            countdown_secs: 3,
            pre_shot_ms: 500,
            post_shot_ms: 2000,
            flash_ms: 150,
            results_delay_ms: 750,
            acquire_timeout_ms: 15_000,
        }
    }
}

impl CaptureTiming {
    /// No waits at all, keeping the acquisition timeout. Useful for batch runs.
    pub fn instant() -> Self {
        Self {
            countdown_secs: 0,
            pre_shot_ms: 0,
            post_shot_ms: 0,
            flash_ms: 0,
            results_delay_ms: 0,
            ..Self::default()
        }
    }

    /// One countdown tick.
    pub fn tick(&self) -> Duration {
        Duration::from_secs(1)
    }

    /// See [`CaptureTiming::pre_shot_ms`].
    pub fn pre_shot(&self) -> Duration {
        Duration::from_millis(self.pre_shot_ms)
    }

    /// See [`CaptureTiming::post_shot_ms`].
    pub fn post_shot(&self) -> Duration {
        Duration::from_millis(self.post_shot_ms)
    }

    /// See [`CaptureTiming::flash_ms`].
    pub fn flash(&self) -> Duration {
        Duration::from_millis(self.flash_ms)
    }

    /// See [`CaptureTiming::results_delay_ms`].
    pub fn results_delay(&self) -> Duration {
        Duration::from_millis(self.results_delay_ms)
    }

    /// See [`CaptureTiming::acquire_timeout_ms`].
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }
}
