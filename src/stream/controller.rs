//! Stream controller
//!
//! Reconciles bus notifications (fullscreen, pointer lock, settings, video
//! geometry) and media lifecycle callbacks with the rendering surface, and
//! turns raw pointer input into bus events.
//!
//! # Threading
//!
//! The controller is single-threaded. Mirror copying, the deferred padding
//! re-measure and pointer lock requests are spawned with
//! `tokio::task::spawn_local`, so every call that may start them must run
//! inside a [`tokio::task::LocalSet`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::{Error, Result};
use crate::event::payload::{MouseMotion, MousePress, VideoGeometry};
use crate::event::{topic, EventBus, Subscription, Topic};
use crate::surface::media::MediaError;
use crate::surface::platform::{Platform, Surface, SurfaceId, VideoElement};
use crate::surface::state::{self, ActiveSurface, SurfaceState};

use super::config::StreamConfig;
use super::mirror::{self, MIRROR_SURFACE_ID};
use super::settings::Settings;

/// Controller internals shared with bus listeners and spawned tasks
struct Inner<P: Platform> {
    /// Back-reference for tasks that outlive the current call
    this: Weak<RefCell<Inner<P>>>,
    platform: P,
    video: P::Video,
    config: StreamConfig,
    state: SurfaceState<P::Mirror>,
}

impl<P: Platform + 'static> Inner<P> {
    /// Surface currently presenting video
    fn active(&self) -> &dyn Surface {
        match &self.state.mirror {
            Some(session) => session.surface(),
            None => &self.video,
        }
    }

    fn set_mirroring(&mut self, enable: bool) {
        if enable {
            if self.video.is_paused() || self.video.is_ended() {
                tracing::debug!("Mirror mode needs a playing video, skipped");
                return;
            }
            if self.active().id().as_str() == MIRROR_SURFACE_ID {
                return;
            }

            let session = mirror::open_session(
                &self.platform,
                &self.video,
                self.config.mirror_update_interval,
            );
            self.video.set_hidden(true);
            session.surface().set_hidden(false);
            self.state.mirror = Some(session);

            tracing::info!(surface = MIRROR_SURFACE_ID, "Mirror mode enabled");
        } else {
            self.video.set_hidden(false);

            // Dropping the session aborts its timer
            if let Some(session) = self.state.mirror.take() {
                self.platform.detach(session.surface());
                tracing::info!(surface = MIRROR_SURFACE_ID, "Mirror mode disabled");
            }
        }
    }

    fn on_settings_changed(&mut self, settings: &Settings) {
        if settings.mirror_mode != self.config.mirror_mode {
            self.set_mirroring(settings.mirror_mode.is_mirror());
            self.config.mirror_mode = settings.mirror_mode;
        }
        if settings.force_fullscreen != self.config.force_fullscreen {
            self.config.force_fullscreen = settings.force_fullscreen;
        }
    }

    fn on_fullscreen_change(&mut self, element: &Option<SurfaceId>) {
        let fullscreen = element.is_some();
        self.state.fullscreen = fullscreen;

        if fullscreen {
            let viewport = self.platform.viewport();
            let padding = state::fullscreen_padding(
                viewport.window.width,
                viewport.document.width,
                self.state.aspect_ratio,
            );
            self.video.set_horizontal_padding(padding);
            self.schedule_padding_remeasure();
        } else {
            self.video.set_horizontal_padding(0.0);
        }

        self.video.set_media_controls(!fullscreen);
        self.video.blur();

        tracing::info!(fullscreen = fullscreen, "Fullscreen changed");

        if !self.state.pointer_lock_required {
            return;
        }

        if fullscreen && !self.state.pointer_lock_engaged {
            self.request_pointer_lock();
        }
        self.state.pointer_buttons_wired = fullscreen;
    }

    /// Measure the padding again once the viewport has settled
    ///
    /// Some browsers report stale viewport metrics in the fullscreen change
    /// notification itself.
    fn schedule_padding_remeasure(&self) {
        let this = self.this.clone();
        let delay = self.config.fullscreen_settle_delay;

        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;

            let Some(shared) = this.upgrade() else {
                return;
            };
            let Ok(inner) = shared.try_borrow() else {
                return;
            };
            if !inner.state.fullscreen {
                return;
            }

            let viewport = inner.platform.viewport();
            let padding = state::fullscreen_padding(
                viewport.window.height,
                viewport.document.height,
                inner.state.aspect_ratio,
            );
            inner.video.set_horizontal_padding(padding);
        });
    }

    fn request_pointer_lock(&self) {
        let request = self.video.request_pointer_lock();

        tokio::task::spawn_local(async move {
            match request.await {
                Ok(()) => tracing::debug!("Pointer lock granted"),
                Err(err) => tracing::debug!(error = %err, "Pointer lock request rejected"),
            }
        });
    }

    fn on_pointer_lock_change(&mut self, element: &Option<SurfaceId>) {
        if !self.state.pointer_lock_required {
            return;
        }

        let engaged = element.as_ref() == Some(&self.video.id());
        self.state.pointer_lock_engaged = engaged;
        self.state.pointer_motion_wired = engaged;
        if !engaged {
            self.state.reset_residual();
        }

        tracing::debug!(locked = engaged, "Pointer lock changed");
    }

    fn on_kb_mouse_flag(&mut self) {
        if !self.state.pointer_lock_required {
            tracing::info!("Keyboard and mouse will be locked in fullscreen");
        }
        self.state.pointer_lock_required = true;
    }

    fn on_video_geometry(&mut self, geometry: &VideoGeometry) {
        if !(geometry.aspect > 0.0 && geometry.aspect.is_finite()) {
            tracing::warn!(aspect = geometry.aspect, "Ignoring video geometry with bad aspect");
            return;
        }

        let (width, height) = geometry.scaled_size();
        let fit = state::select_fit(geometry);

        self.state.aspect_ratio = geometry.aspect;
        self.state.logical_height = height;
        self.state.logical_width = (height * geometry.aspect).floor();

        let active = self.active();
        active.set_object_fit(fit);
        active.set_pixel_size(width, height);
        active.set_aspect_ratio(geometry.aspect);

        tracing::debug!(
            width = width,
            height = height,
            aspect = geometry.aspect,
            fit = ?fit,
            "Video geometry updated"
        );
    }

    fn scale_pointer_motion(&mut self, dx: f64, dy: f64) -> Option<MouseMotion> {
        if !self.state.pointer_motion_wired {
            return None;
        }

        let intrinsic = self.video.intrinsic_size();
        let displayed = state::displayed_size(
            self.state.fullscreen,
            intrinsic,
            self.video.offset_size(),
            self.video.bounding_size(),
            self.state.aspect_ratio,
        );

        let motion = self.state.scale_motion(dx, dy, displayed, intrinsic);
        if motion.is_none() {
            tracing::trace!(dx = dx, dy = dy, "Pointer motion dropped, no video size yet");
        }
        motion
    }
}

/// Drives the rendering surface from bus events and platform callbacks
///
/// # Example
/// ```no_run
/// # use stream_view::surface::Platform;
/// # async fn example<P: Platform + 'static>(platform: P) -> stream_view::Result<()> {
/// use stream_view::event::{topic, EventBus};
/// use stream_view::{Settings, StreamConfig, StreamController};
///
/// let bus = EventBus::new();
/// let local = tokio::task::LocalSet::new();
///
/// local
///     .run_until(async {
///         let controller = StreamController::new(bus.clone(), platform, StreamConfig::default());
///         controller.init(&Settings::default())?;
///         controller.play().await?;
///
///         bus.notify(topic::KB_MOUSE_FLAG)?;
///         controller.force_fullscreen_maybe()
///     })
///     .await
/// # }
/// ```
pub struct StreamController<P: Platform + 'static> {
    shared: Rc<RefCell<Inner<P>>>,
    bus: EventBus,
    subscriptions: Vec<Subscription>,
}

impl<P: Platform + 'static> StreamController<P> {
    /// Create a controller and subscribe it to its bus topics
    pub fn new(bus: EventBus, platform: P, config: StreamConfig) -> Self {
        let video = platform.video();
        let state = SurfaceState::new(config.default_aspect);

        let shared = Rc::new_cyclic(|this| {
            RefCell::new(Inner {
                this: this.clone(),
                platform,
                video,
                config,
                state,
            })
        });

        let subscriptions = vec![
            bind(&bus, topic::SETTINGS_CHANGED, &shared, Inner::on_settings_changed),
            bind(&bus, topic::FULLSCREEN_CHANGE, &shared, Inner::on_fullscreen_change),
            bind(&bus, topic::POINTER_LOCK_CHANGE, &shared, Inner::on_pointer_lock_change),
            bind(&bus, topic::APP_VIDEO_CHANGED, &shared, Inner::on_video_geometry),
            bind(&bus, topic::KB_MOUSE_FLAG, &shared, |inner, _: &()| {
                inner.on_kb_mouse_flag()
            }),
        ];

        Self {
            shared,
            bus,
            subscriptions,
        }
    }

    fn with_inner<R>(&self, f: impl FnOnce(&mut Inner<P>) -> R) -> Result<R> {
        let mut inner = self
            .shared
            .try_borrow_mut()
            .map_err(|_| Error::ControllerBusy)?;
        Ok(f(&mut inner))
    }

    /// Read the surface state
    pub fn with_state<R>(&self, f: impl FnOnce(&SurfaceState<P::Mirror>) -> R) -> Result<R> {
        let inner = self.shared.try_borrow().map_err(|_| Error::ControllerBusy)?;
        Ok(f(&inner.state))
    }

    /// Surface currently presenting video
    pub fn active_surface(&self) -> Result<ActiveSurface> {
        self.with_state(|state| state.active_surface())
    }

    pub fn is_fullscreen(&self) -> Result<bool> {
        self.with_state(|state| state.fullscreen)
    }

    pub fn is_pointer_locked(&self) -> Result<bool> {
        self.with_state(|state| state.pointer_lock_engaged)
    }

    pub fn is_mirroring(&self) -> Result<bool> {
        self.with_state(|state| state.mirror.is_some())
    }

    /// Tracked display aspect ratio
    pub fn aspect_ratio(&self) -> Result<f64> {
        self.with_state(|state| state.aspect_ratio)
    }

    /// Logical `(width, height)` from the last geometry update
    pub fn logical_size(&self) -> Result<(f64, f64)> {
        self.with_state(|state| (state.logical_width, state.logical_height))
    }

    /// The primary video element
    pub fn video(&self) -> Result<P::Video> {
        self.with_inner(|inner| inner.video.clone())
    }

    /// Take the load-time settings
    pub fn init(&self, settings: &Settings) -> Result<()> {
        self.with_inner(|inner| inner.config.apply_settings(settings))
    }

    /// Switch between the video element and the mirror surface
    ///
    /// Enabling is a no-op while the video is paused or ended, or when
    /// already mirroring. Disabling is a no-op when not mirroring.
    pub fn set_mirroring(&self, enable: bool) -> Result<()> {
        self.with_inner(|inner| inner.set_mirroring(enable))
    }

    /// Enter fullscreen, or leave it if the surface already fills the window
    pub fn toggle_fullscreen(&self) -> Result<()> {
        self.with_inner(|inner| {
            let height = inner.active().computed_height();
            let enter = height != inner.platform.viewport().inner.height;
            inner.platform.set_fullscreen(enter, &inner.active().id());
        })
    }

    /// Toggle fullscreen on load when configured, except on touch devices
    pub fn force_fullscreen_maybe(&self) -> Result<()> {
        let (touch, force) = self.with_inner(|inner| {
            (inner.platform.is_mobile_device(), inner.config.force_fullscreen)
        })?;

        tracing::debug!(touch = touch, force = force, "Force fullscreen check");

        if !touch && force {
            self.toggle_fullscreen()?;
        }
        Ok(())
    }

    /// Start playback
    ///
    /// A rejection (typically the autoplay policy) is logged and returned;
    /// playback is not retried.
    pub async fn play(&self) -> Result<()> {
        let request = self.with_inner(|inner| inner.video.play())?;

        match request.await {
            Ok(()) => {
                tracing::debug!("Media can autoplay");
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "Media failed to play");
                Err(err.into())
            }
        }
    }

    /// Mute or unmute the media
    pub fn mute(&self, mute: bool) -> Result<()> {
        self.with_inner(|inner| inner.video.set_muted(mute))
    }

    /// Show or hide the active surface
    pub fn set_visible(&self, show: bool) -> Result<()> {
        self.with_inner(|inner| inner.active().set_hidden(!show))
    }

    /// Media started loading
    pub fn on_load_start(&self) -> Result<()> {
        self.with_inner(|inner| {
            inner.video.set_volume(inner.config.volume);
            inner.video.set_poster(Some(inner.config.poster.as_str()));
        })
    }

    /// Media metadata (intrinsic size) became known
    pub fn on_loaded_metadata(&self) -> Result<()> {
        self.with_inner(|inner| {
            if let Some(session) = inner.state.mirror() {
                let size = inner.video.intrinsic_size();
                session.surface().set_pixel_size(size.width, size.height);
            }
        })
    }

    /// Media can start playing
    pub fn on_can_play(&self) -> Result<()> {
        self.with_inner(|inner| {
            inner.video.set_poster(None);
            let mirror = inner.config.mirror_mode.is_mirror();
            inner.set_mirroring(mirror);
        })
    }

    /// The video element received focus
    pub fn on_focus(&self) -> Result<()> {
        self.with_inner(|inner| inner.video.blur())
    }

    /// The video element reported a playback fault
    pub fn on_media_error(&self, code: u16) -> MediaError {
        let err = MediaError::from_code(code);
        tracing::error!(code = err.code(), "{}", err.message());
        err
    }

    /// Raw pointer button went down on the surface
    pub fn on_pointer_down(&self, button: i16) -> Result<()> {
        self.pointer_button(button, true)
    }

    /// Raw pointer button went up on the surface
    pub fn on_pointer_up(&self, button: i16) -> Result<()> {
        self.pointer_button(button, false)
    }

    fn pointer_button(&self, button: i16, pressed: bool) -> Result<()> {
        let wired = self.with_state(|state| state.pointer_buttons_wired)?;
        if !wired {
            return Ok(());
        }
        self.bus
            .publish(topic::MOUSE_PRESSED, MousePress { button, pressed })
    }

    /// Raw relative pointer motion, in screen pixels
    ///
    /// Published as intrinsic video pixels while the pointer is locked.
    pub fn on_pointer_move(&self, dx: f64, dy: f64) -> Result<()> {
        // The borrow ends before publishing so listeners may call back in
        let motion = self.with_inner(|inner| inner.scale_pointer_motion(dx, dy))?;

        match motion {
            Some(motion) => self.bus.publish(topic::MOUSE_MOVED, motion),
            None => Ok(()),
        }
    }
}

impl<P: Platform + 'static> Drop for StreamController<P> {
    fn drop(&mut self) {
        for sub in &self.subscriptions {
            sub.unsubscribe();
        }
        if let Ok(mut inner) = self.shared.try_borrow_mut() {
            inner.set_mirroring(false);
        }
    }
}

/// Subscribe a controller handler to a topic
fn bind<P, T, F>(
    bus: &EventBus,
    topic: Topic<T>,
    shared: &Rc<RefCell<Inner<P>>>,
    handler: F,
) -> Subscription
where
    P: Platform + 'static,
    T: 'static,
    F: Fn(&mut Inner<P>, &T) + 'static,
{
    let weak = Rc::downgrade(shared);

    bus.subscribe(topic, move |data| {
        let Some(shared) = weak.upgrade() else {
            return Ok(());
        };
        let mut inner = shared.try_borrow_mut().map_err(|_| Error::ControllerBusy)?;
        handler(&mut inner, data);
        Ok(())
    })
}
