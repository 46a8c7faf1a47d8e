//! Capture controller and its camera seam.

/// Camera and cue ports.
pub mod camera;
/// Cooperative cancellation.
pub mod cancel;
/// The capture state machine.
pub mod controller;
/// Per-shot frame processing.
pub mod frame;
/// Published controller status.
pub mod status;
/// Generated-frame camera.
pub mod synthetic;
