//! Deployment configuration, per-session key resolution, user preferences and capture pacing.

/// Environment configuration.
pub mod env;
/// Persisted user preferences.
pub mod prefs;
/// Per-session configuration key.
pub mod session;
/// Capture pacing.
pub mod timing;
