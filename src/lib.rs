//! Pocket Booth is a photo-booth capture pipeline.
//!
//! A [`CaptureController`] acquires a camera, counts down, takes a timed series of filtered
//! square shots and hands the resulting [`PhotoStrip`] to a [`StripStore`]. Strips are
//! rendered into a single labeled image by [`compose_strip`] and can be exported locally or
//! uploaded through an [`UploadGateway`] under a per-key [`UsageLimiter`] quota.
//!
//! Every side effect sits behind a port: [`CameraDevice`] for video, [`KeyValueStore`] for
//! persistence and [`UploadTransport`] for the network.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;

pub mod capture;
pub mod config;
pub mod export;
pub mod filters;
pub mod limits;
pub mod storage;
pub mod strip;
pub mod upload;

pub use crate::foundation::core::{FacingMode, Rgb8, ShotCount, StripStyle};
pub use crate::foundation::error::{BoothError, BoothResult};

pub use crate::capture::camera::{CameraDevice, CaptureCues, SilentCues, VideoStream};
pub use crate::capture::controller::CaptureController;
pub use crate::capture::status::{CaptureStatus, Stage};
pub use crate::capture::synthetic::SyntheticCamera;
pub use crate::config::env::BoothConfig;
pub use crate::config::prefs::{PreferenceStore, Preferences};
pub use crate::config::session::{ConfigSession, SessionConfig};
pub use crate::config::timing::CaptureTiming;
pub use crate::export::{ExportRoute, Exported, export_strip};
pub use crate::filters::{FilterKind, FilterSpec, apply_filter};
pub use crate::limits::usage::{Remaining, UsageLimiter};
pub use crate::storage::kv::{FileStore, KeyValueStore, MemoryStore};
pub use crate::storage::strips::{PhotoStrip, StripStore};
pub use crate::strip::compose::{StripOptions, compose_strip, render_strip};
pub use crate::upload::flow::{show_upload, upload_strip};
pub use crate::upload::gateway::{
    ReqwestTransport, UploadGateway, UploadOutcome, UploadRequest, UploadTransport,
};
