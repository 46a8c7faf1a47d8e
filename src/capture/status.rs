use crate::foundation::core::FacingMode;

/// Lifecycle stage of the capture controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// No camera; either inactive or waiting for a retry after a camera error.
    #[default]
    Idle,
    /// Acquiring the camera.
    Loading,
    /// Camera live, waiting for the user to start.
    Ready,
    /// Counting down to the first shot.
    Countdown,
    /// Taking shots.
    Capturing,
    /// Strip saved; camera released.
    Complete,
}

impl Stage {
    /// Whether a capture run is in flight.
    pub fn is_running(self) -> bool {
        matches!(self, Self::Countdown | Self::Capturing)
    }
}

/// Snapshot published on every controller change.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct CaptureStatus {
    /// Current stage.
    pub stage: Stage,
    /// Camera the controller is set to.
    pub facing: FacingMode,
    /// Seconds left in the countdown while in [`Stage::Countdown`].
    pub countdown: Option<u32>,
    /// One-based index of the shot in progress; 0 before the first.
    pub shot: usize,
    /// Shots planned for the run.
    pub shot_total: usize,
    /// Flash cue is showing.
    pub flash: bool,
    /// Frames skipped because the camera had nothing to give.
    pub dropped_frames: usize,
    /// Camera acquisition failure shown with a retry action.
    pub camera_error: Option<String>,
    /// Informational message about the last run.
    pub message: Option<String>,
    /// The results view may be shown.
    pub results_ready: bool,
}

impl CaptureStatus {
    /// What the countdown overlay shows: the number, or `!` at zero.
    pub fn countdown_glyph(&self) -> Option<String> {
        self.countdown.map(|n| match n {
            0 => "!".to_string(),
            n => n.to_string(),
        })
    }
}
