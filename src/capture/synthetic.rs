use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use image::{Rgba, RgbaImage};

use crate::{
    capture::camera::{CameraDevice, VideoStream},
    foundation::{
        core::{FacingMode, Rgb8},
        error::{BoothError, BoothResult},
    },
};

const PALETTE: [Rgb8; 5] = [
    Rgb8::new(0xff, 0x6b, 0x6b),
    Rgb8::new(0x4e, 0xcd, 0xc4),
    Rgb8::new(0x45, 0xb7, 0xd1),
    Rgb8::new(0xff, 0xa0, 0x7a),
    Rgb8::new(0x98, 0xd8, 0xc8),
];

/// Camera that generates diagonal gradient frames, one palette step per grab.
///
/// Useful without hardware and in tests: it can refuse access, delay acquisition, report
/// "not ready" for the first grabs, and it counts open streams so leaks are observable.
#[derive(Debug)]
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    denied: Mutex<Option<String>>,
    open_delay: Option<Duration>,
    not_ready: Arc<AtomicUsize>,
    open_streams: Arc<AtomicUsize>,
    opened_total: AtomicUsize,
}

impl SyntheticCamera {
    /// Camera producing `width`×`height` frames.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            denied: Mutex::new(None),
            open_delay: None,
            not_ready: Arc::new(AtomicUsize::new(0)),
            open_streams: Arc::new(AtomicUsize::new(0)),
            opened_total: AtomicUsize::new(0),
        }
    }

    /// Refuse every acquisition with `reason`.
    pub fn denying(self, reason: impl Into<String>) -> Self {
        self.set_denied(Some(reason.into()));
        self
    }

    /// Make acquisition take `delay`.
    pub fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = Some(delay);
        self
    }

    /// Report "not ready" for the next `grabs` frame grabs, across streams.
    pub fn not_ready_for(self, grabs: usize) -> Self {
        self.not_ready.store(grabs, Ordering::SeqCst);
        self
    }

    /// Change the refusal reason; `None` grants access again.
    pub fn set_denied(&self, reason: Option<String>) {
        if let Ok(mut d) = self.denied.lock() {
            *d = reason;
        }
    }

    /// Streams currently open.
    pub fn open_streams(&self) -> usize {
        self.open_streams.load(Ordering::SeqCst)
    }

    /// Streams ever handed out.
    pub fn opened_total(&self) -> usize {
        self.opened_total.load(Ordering::SeqCst)
    }
}

impl Default for SyntheticCamera {
    fn default() -> Self {
        Self::new(800, 800)
    }
}

#[async_trait::async_trait]
impl CameraDevice for SyntheticCamera {
    async fn open(&self, facing: FacingMode) -> BoothResult<Box<dyn VideoStream>> {
        if let Some(delay) = self.open_delay {
            tokio::time::sleep(delay).await;
        }
        let denied = self
            .denied
            .lock()
            .map_err(|_| BoothError::camera("camera state lock poisoned"))?
            .clone();
        if let Some(reason) = denied {
            return Err(BoothError::camera(reason));
        }

        self.open_streams.fetch_add(1, Ordering::SeqCst);
        self.opened_total.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(%facing, "synthetic stream opened");
        Ok(Box::new(SyntheticStream {
            facing,
            width: self.width,
            height: self.height,
            grabs: 0,
            live: true,
            not_ready: Arc::clone(&self.not_ready),
            open_streams: Arc::clone(&self.open_streams),
        }))
    }
}

struct SyntheticStream {
    facing: FacingMode,
    width: u32,
    height: u32,
    grabs: usize,
    live: bool,
    not_ready: Arc<AtomicUsize>,
    open_streams: Arc<AtomicUsize>,
}

impl VideoStream for SyntheticStream {
    fn facing(&self) -> FacingMode {
        self.facing
    }

    fn grab_frame(&mut self) -> Option<RgbaImage> {
        if !self.live {
            return None;
        }
        let pending = self
            .not_ready
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if pending.is_ok() {
            return None;
        }
        let frame = gradient_frame(self.width, self.height, self.grabs);
        self.grabs += 1;
        Some(frame)
    }

    fn stop(&mut self) {
        if std::mem::replace(&mut self.live, false) {
            self.open_streams.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for SyntheticStream {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Diagonal blend from palette entry `index` to the next one.
pub fn gradient_frame(width: u32, height: u32, index: usize) -> RgbaImage {
    let from = PALETTE[index % PALETTE.len()];
    let to = PALETTE[(index + 1) % PALETTE.len()];
    let span = (width + height).saturating_sub(2).max(1) as f32;
    RgbaImage::from_fn(width, height, |x, y| {
        let t = (x + y) as f32 / span;
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba([mix(from.r, to.r), mix(from.g, to.g), mix(from.b, to.b), 255])
    })
}

#[cfg(test)]
#[path = "../../tests/unit/capture/synthetic.rs"]
mod tests;
