use image::RgbaImage;

use crate::foundation::{core::FacingMode, error::BoothResult};

/// Source of live camera streams.
#[async_trait::async_trait]
pub trait CameraDevice: Send + Sync {
    /// Acquire a stream from the camera facing `facing`. Permission refusals and missing
    /// hardware surface as [`crate::BoothError::Camera`].
    async fn open(&self, facing: FacingMode) -> BoothResult<Box<dyn VideoStream>>;
}

/// A live, exclusively owned video stream.
pub trait VideoStream: Send {
    /// Camera this stream comes from.
    fn facing(&self) -> FacingMode;

    /// Current frame, or `None` while the source is not yet producing decodable frames.
    fn grab_frame(&mut self) -> Option<RgbaImage>;

    /// Release the device. Idempotent.
    fn stop(&mut self);
}

/// Presentation cues fired around each shot.
pub trait CaptureCues: Send + Sync {
    /// Full-frame flash starts.
    fn flash(&self) {}

    /// Shutter sound.
    fn shutter(&self) {}

    /// The results view may be shown.
    fn results_ready(&self) {}
}

/// Cues that do nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentCues;

impl CaptureCues for SilentCues {}
