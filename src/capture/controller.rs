use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use tokio::{sync::watch, time::Instant};

use crate::{
    capture::{
        camera::{CameraDevice, CaptureCues, SilentCues, VideoStream},
        cancel::{CancelToken, Cancelled},
        frame::{Frame, process_frame},
        status::{CaptureStatus, Stage},
    },
    config::{
        prefs::{PreferenceStore, Preferences},
        timing::CaptureTiming,
    },
    filters::FilterKind,
    foundation::{
        core::{FacingMode, ShotCount, StripStyle},
        error::{BoothError, BoothResult},
    },
    storage::strips::{PhotoStrip, StripStore},
};

const EMPTY_RUN_MESSAGE: &str =
    "No photos were captured because the camera was not ready. Please try again.";

struct Inner {
    stage: Stage,
    active: bool,
    /// Bumped whenever an in-flight acquisition must be discarded on arrival.
    epoch: u64,
    stream: Option<Box<dyn VideoStream>>,
    prefs: Preferences,
    run: Option<CancelToken>,
    last_strip: Option<PhotoStrip>,
}

impl Inner {
    fn release_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            tracing::debug!(facing = %stream.facing(), "camera released");
        }
    }
}

enum RunEnd {
    Finished(PhotoStrip),
    Cancelled,
}

/// Drives the capture lifecycle: camera acquisition, countdown, timed shots and handoff of
/// the finished strip to the [`StripStore`].
///
/// The hosting view calls [`activate`](Self::activate) when the capture screen becomes visible
/// and [`deactivate`](Self::deactivate) when it goes away; both are idempotent. The controller
/// owns at most one open stream at any time and never keeps it once the run finishes.
/// Progress is published on a watch channel, see [`subscribe`](Self::subscribe).
pub struct CaptureController {
    camera: Arc<dyn CameraDevice>,
    store: Arc<StripStore>,
    cues: Arc<dyn CaptureCues>,
    prefs_store: Option<PreferenceStore>,
    timing: CaptureTiming,
    inner: Mutex<Inner>,
    status: watch::Sender<CaptureStatus>,
}

impl std::fmt::Debug for CaptureController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureController")
            .field("timing", &self.timing)
            .field("status", &*self.status.borrow())
            .finish_non_exhaustive()
    }
}

impl CaptureController {
    /// Controller starting in [`Stage::Idle`] with the given session preferences.
    pub fn new(
        camera: Arc<dyn CameraDevice>,
        store: Arc<StripStore>,
        prefs: Preferences,
        timing: CaptureTiming,
    ) -> Self {
        let status = CaptureStatus {
            facing: prefs.facing(),
            shot_total: prefs.shot_count().get(),
            ..CaptureStatus::default()
        };
        Self {
            camera,
            store,
            cues: Arc::new(SilentCues),
            prefs_store: None,
            timing,
            inner: Mutex::new(Inner {
                stage: Stage::Idle,
                active: false,
                epoch: 0,
                stream: None,
                prefs,
                run: None,
                last_strip: None,
            }),
            status: watch::Sender::new(status),
        }
    }

    /// Route flash and shutter cues to `cues`.
    pub fn with_cues(mut self, cues: Arc<dyn CaptureCues>) -> Self {
        self.cues = cues;
        self
    }

    /// Save preferences through `store` whenever a setter changes them.
    ///
    /// Without a store the setters only affect this controller.
    pub fn with_preference_store(mut self, store: PreferenceStore) -> Self {
        self.prefs_store = Some(store);
        self
    }

    /// Live status feed.
    pub fn subscribe(&self) -> watch::Receiver<CaptureStatus> {
        self.status.subscribe()
    }

    /// Latest status.
    pub fn status(&self) -> CaptureStatus {
        self.status.borrow().clone()
    }

    /// Current stage.
    pub fn stage(&self) -> Stage {
        self.status.borrow().stage
    }

    /// Preferences the next run will use.
    pub fn preferences(&self) -> BoothResult<Preferences> {
        Ok(self.lock()?.prefs)
    }

    /// Strip produced by the last completed run, until retake.
    pub fn last_strip(&self) -> BoothResult<Option<PhotoStrip>> {
        Ok(self.lock()?.last_strip.clone())
    }

    /// Select the filter for the next run.
    pub fn set_filter(&self, filter: FilterKind) -> BoothResult<()> {
        let prefs = {
            let mut inner = self.lock()?;
            inner.prefs.set_filter(filter);
            inner.prefs
        };
        self.persist(&prefs)
    }

    /// Select the strip style for the next run.
    pub fn set_style(&self, style: StripStyle) -> BoothResult<()> {
        let prefs = {
            let mut inner = self.lock()?;
            inner.prefs.set_style(style);
            inner.prefs
        };
        self.persist(&prefs)
    }

    /// Select the shot count for the next run, clamped into range.
    pub fn set_shot_count(&self, n: u32) -> BoothResult<ShotCount> {
        let (count, prefs) = {
            let mut inner = self.lock()?;
            let count = inner.prefs.set_shot_count(n);
            if !inner.stage.is_running() {
                self.publish(&inner, |s| s.shot_total = count.get());
            }
            (count, inner.prefs)
        };
        self.persist(&prefs)?;
        Ok(count)
    }

    fn persist(&self, prefs: &Preferences) -> BoothResult<()> {
        match &self.prefs_store {
            Some(store) => store.save(prefs),
            None => Ok(()),
        }
    }

    /// The capture view became visible: acquire the camera.
    #[tracing::instrument(skip(self))]
    pub async fn activate(&self) -> BoothResult<()> {
        {
            let mut inner = self.lock()?;
            let already = inner.active && inner.stage != Stage::Idle;
            inner.active = true;
            if already || inner.stage == Stage::Complete {
                return Ok(());
            }
        }
        self.acquire().await
    }

    /// The capture view went away: cancel any run and release the camera.
    ///
    /// A completed run keeps its [`Stage::Complete`] so the results stay reachable.
    #[tracing::instrument(skip(self))]
    pub fn deactivate(&self) -> BoothResult<()> {
        let mut inner = self.lock()?;
        inner.active = false;
        inner.epoch += 1;
        if let Some(run) = inner.run.take() {
            tracing::info!("cancelling capture run");
            run.cancel();
        }
        inner.release_stream();
        if inner.stage != Stage::Complete {
            inner.stage = Stage::Idle;
        }
        self.publish(&inner, |s| {
            s.countdown = None;
            s.flash = false;
        });
        Ok(())
    }

    /// Retry acquisition after a camera error.
    pub async fn retry_camera(&self) -> BoothResult<()> {
        {
            let mut inner = self.lock()?;
            if inner.stage != Stage::Idle {
                return Ok(());
            }
            inner.active = true;
        }
        self.acquire().await
    }

    /// Switch cameras. An open stream is stopped before the other camera is acquired.
    #[tracing::instrument(skip(self))]
    pub async fn set_facing_mode(&self, facing: FacingMode) -> BoothResult<()> {
        let (reacquire, prefs) = {
            let mut inner = self.lock()?;
            if inner.stage.is_running() {
                return Err(BoothError::validation(
                    "cannot switch cameras during a capture session",
                ));
            }
            if inner.prefs.facing() == facing {
                return Ok(());
            }
            inner.prefs.set_facing(facing);
            let reacquire = inner.active && inner.stage != Stage::Complete;
            if reacquire {
                inner.epoch += 1;
                inner.release_stream();
                inner.stage = Stage::Idle;
            }
            self.publish(&inner, |s| s.facing = facing);
            (reacquire, inner.prefs)
        };
        self.persist(&prefs)?;
        if reacquire {
            self.acquire().await?;
        }
        Ok(())
    }

    /// Discard the finished strip reference and get the camera back for another run.
    /// Strips already saved are untouched.
    #[tracing::instrument(skip(self))]
    pub async fn retake(&self) -> BoothResult<()> {
        {
            let mut inner = self.lock()?;
            if inner.stage != Stage::Complete {
                return Err(BoothError::validation("nothing to retake"));
            }
            inner.last_strip = None;
            inner.stage = Stage::Idle;
            self.publish(&inner, |s| {
                s.results_ready = false;
                s.message = None;
            });
            if !inner.active {
                return Ok(());
            }
        }
        self.acquire().await
    }

    /// Run one capture session from the ready state.
    ///
    /// Returns the saved strip, or `None` when the call was ignored because a run is already
    /// in progress or when the run was cancelled by [`deactivate`](Self::deactivate).
    #[tracing::instrument(skip(self))]
    pub async fn start_session(&self) -> BoothResult<Option<PhotoStrip>> {
        let (token, prefs) = {
            let mut inner = self.lock()?;
            match inner.stage {
                Stage::Countdown | Stage::Capturing => {
                    tracing::debug!("session already running; start ignored");
                    return Ok(None);
                }
                Stage::Ready if inner.stream.is_some() => {}
                stage => {
                    return Err(BoothError::validation(format!(
                        "cannot start a session while {stage:?}"
                    )));
                }
            }
            let token = CancelToken::new();
            inner.run = Some(token.clone());
            inner.stage = Stage::Countdown;
            let prefs = inner.prefs;
            self.publish(&inner, |s| {
                s.countdown = Some(self.timing.countdown_secs);
                s.shot = 0;
                s.shot_total = prefs.shot_count().get();
                s.dropped_frames = 0;
                s.message = None;
                s.results_ready = false;
            });
            (token, prefs)
        };

        let result = self.run(&token, prefs).await;

        let mut inner = self.lock()?;
        if inner.run.as_ref().is_some_and(|r| r.same_as(&token)) {
            inner.run = None;
        }
        match result {
            Ok(RunEnd::Finished(strip)) => Ok(Some(strip)),
            Ok(RunEnd::Cancelled) => {
                tracing::info!("capture run cancelled; partial frames discarded");
                Ok(None)
            }
            Err(e) => {
                inner.release_stream();
                inner.stage = Stage::Idle;
                let msg = e.user_message();
                self.publish(&inner, |s| {
                    s.countdown = None;
                    s.flash = false;
                    s.message = Some(msg);
                });
                Err(e)
            }
        }
    }

    async fn run(&self, token: &CancelToken, prefs: Preferences) -> BoothResult<RunEnd> {
        match self.run_steps(token, prefs).await {
            Ok(end) => Ok(end),
            Err(RunError::Cancelled) => Ok(RunEnd::Cancelled),
            Err(RunError::Failed(e)) => Err(e),
        }
    }

    async fn run_steps(&self, token: &CancelToken, prefs: Preferences) -> Result<RunEnd, RunError> {
        for n in (1..=self.timing.countdown_secs).rev() {
            self.update(token, |_, s| s.countdown = Some(n))?;
            token.sleep(self.timing.tick()).await?;
        }
        self.update(token, |inner, s| {
            inner.stage = Stage::Capturing;
            s.countdown = Some(0);
        })?;

        let total = prefs.shot_count().get();
        let mut photos = Vec::with_capacity(total);
        let mut flash_off = None;
        for order in 0..total {
            self.pause(token, self.timing.pre_shot(), &mut flash_off).await?;
            if let Some(frame) = self.take_shot(token, order, prefs)? {
                photos.push(frame.data_url);
            }
            flash_off = Some(Instant::now() + self.timing.flash());
            if order + 1 < total {
                self.pause(token, self.timing.post_shot(), &mut flash_off).await?;
            }
        }

        let strip = {
            let mut inner = self.lock()?;
            token.check()?;
            inner.release_stream();
            if photos.is_empty() {
                tracing::warn!(shots = total, "every frame was dropped; nothing saved");
                return Err(BoothError::capture(EMPTY_RUN_MESSAGE).into());
            }
            let strip = PhotoStrip::now(self.store.next_id(), photos, prefs.style());
            self.store.append(strip.clone())?;
            inner.run = None;
            inner.stage = Stage::Complete;
            inner.last_strip = Some(strip.clone());
            self.publish(&inner, |s| {
                s.countdown = None;
                s.flash = false;
            });
            strip
        };
        tracing::info!(id = strip.id, photos = strip.photos.len(), "capture run complete");

        tokio::time::sleep(self.timing.results_delay()).await;
        let inner = self.lock()?;
        if inner.stage == Stage::Complete {
            self.publish(&inner, |s| s.results_ready = true);
            self.cues.results_ready();
        }
        Ok(RunEnd::Finished(strip))
    }

    /// Wait `wait`, turning the flash off on the way if its deadline falls inside the wait.
    async fn pause(
        &self,
        token: &CancelToken,
        wait: Duration,
        flash_off: &mut Option<Instant>,
    ) -> Result<(), RunError> {
        let end = Instant::now() + wait;
        if let Some(off) = flash_off.take_if(|off| *off <= end) {
            token.sleep(off.saturating_duration_since(Instant::now())).await?;
            self.update(token, |_, s| s.flash = false)?;
        }
        token.sleep(end.saturating_duration_since(Instant::now())).await?;
        Ok(())
    }

    /// Grab, crop, filter and encode one shot. A camera with nothing to give drops the shot.
    fn take_shot(
        &self,
        token: &CancelToken,
        order: usize,
        prefs: Preferences,
    ) -> Result<Option<Frame>, RunError> {
        let raw = {
            let mut inner = self.lock()?;
            token.check()?;
            self.cues.flash();
            self.cues.shutter();
            self.publish(&inner, |s| {
                s.shot = order + 1;
                s.flash = true;
            });
            inner.stream.as_mut().and_then(|s| s.grab_frame())
        };

        let frame = raw
            .ok_or_else(|| BoothError::capture("camera not ready"))
            .and_then(|raw| process_frame(&raw, order, prefs.facing(), prefs.filter()));
        match frame {
            Ok(frame) => Ok(Some(frame)),
            Err(e) => {
                tracing::warn!(shot = order + 1, error = %e, "frame dropped");
                self.update(token, |_, s| s.dropped_frames += 1)?;
                Ok(None)
            }
        }
    }

    async fn acquire(&self) -> BoothResult<()> {
        let (epoch, facing) = {
            let mut inner = self.lock()?;
            if inner.stream.is_some() {
                inner.stage = Stage::Ready;
                self.publish(&inner, |_| {});
                return Ok(());
            }
            if inner.stage == Stage::Loading {
                return Ok(());
            }
            inner.epoch += 1;
            inner.stage = Stage::Loading;
            self.publish(&inner, |s| {
                s.camera_error = None;
                s.message = None;
            });
            (inner.epoch, inner.prefs.facing())
        };

        let opened = tokio::time::timeout(self.timing.acquire_timeout(), self.camera.open(facing))
            .await
            .unwrap_or_else(|_| {
                Err(BoothError::camera(format!(
                    "Camera did not respond within {} seconds. Check permissions and try again.",
                    self.timing.acquire_timeout().as_secs()
                )))
            });

        let mut inner = self.lock()?;
        if inner.epoch != epoch || !inner.active {
            if let Ok(mut stream) = opened {
                stream.stop();
            }
            tracing::debug!("stale camera acquisition discarded");
            return Ok(());
        }
        match opened {
            Ok(stream) => {
                tracing::info!(%facing, "camera ready");
                inner.stream = Some(stream);
                inner.stage = Stage::Ready;
                self.publish(&inner, |_| {});
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "camera acquisition failed");
                inner.stage = Stage::Idle;
                let msg = e.user_message();
                self.publish(&inner, |s| s.camera_error = Some(msg));
                Err(e)
            }
        }
    }

    /// Mutate state under the lock unless the run was cancelled.
    fn update(
        &self,
        token: &CancelToken,
        f: impl FnOnce(&mut Inner, &mut CaptureStatus),
    ) -> Result<(), RunError> {
        let mut inner = self.lock()?;
        token.check()?;
        self.status.send_modify(|s| {
            f(&mut inner, s);
            s.stage = inner.stage;
        });
        Ok(())
    }

    fn publish(&self, inner: &MutexGuard<'_, Inner>, f: impl FnOnce(&mut CaptureStatus)) {
        self.status.send_modify(|s| {
            f(s);
            s.stage = inner.stage;
            s.facing = inner.prefs.facing();
        });
    }

    fn lock(&self) -> BoothResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| BoothError::capture("capture controller lock poisoned"))
    }
}

enum RunError {
    Cancelled,
    Failed(BoothError),
}

impl From<Cancelled> for RunError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

impl From<BoothError> for RunError {
    fn from(e: BoothError) -> Self {
        Self::Failed(e)
    }
}
