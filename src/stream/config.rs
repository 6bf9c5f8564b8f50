//! Stream controller configuration

use std::time::Duration;

use super::settings::{MirrorMode, Settings};

/// Default mirror refresh rate (frames per second)
pub const DEFAULT_MIRROR_FPS: f64 = 60.0;

/// Controller configuration options
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Media volume in [0, 1]
    pub volume: f64,

    /// Poster shown while the stream loads
    pub poster: String,

    /// Presentation mode
    pub mirror_mode: MirrorMode,

    /// Period of the mirror copy timer
    pub mirror_update_interval: Duration,

    /// Request fullscreen on load (ignored on touch devices)
    pub force_fullscreen: bool,

    /// Aspect ratio assumed until the app reports its geometry
    pub default_aspect: f64,

    /// Delay before the fullscreen padding is measured a second time
    pub fullscreen_settle_delay: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            volume: 0.5,
            poster: "/img/screen_loading.gif".to_string(),
            mirror_mode: MirrorMode::None,
            mirror_update_interval: Duration::from_secs_f64(1.0 / DEFAULT_MIRROR_FPS),
            force_fullscreen: true,
            default_aspect: 4.0 / 3.0,
            fullscreen_settle_delay: Duration::from_millis(1),
        }
    }
}

impl StreamConfig {
    /// Take the user-controlled values from a settings snapshot
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.mirror_mode = settings.mirror_mode;
        self.volume = settings.volume();
        self.force_fullscreen = settings.force_fullscreen;
    }

    /// Set the poster image
    pub fn poster(mut self, poster: impl Into<String>) -> Self {
        self.poster = poster.into();
        self
    }

    /// Set the mirror refresh rate; non-positive rates are ignored
    pub fn mirror_fps(mut self, fps: f64) -> Self {
        if fps > 0.0 && fps.is_finite() {
            self.mirror_update_interval = Duration::from_secs_f64(1.0 / fps);
        }
        self
    }

    /// Set the mirror copy period directly
    pub fn mirror_update_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.mirror_update_interval = interval;
        }
        self
    }

    /// Set the initial aspect ratio; non-positive values are ignored
    pub fn default_aspect(mut self, aspect: f64) -> Self {
        if aspect > 0.0 && aspect.is_finite() {
            self.default_aspect = aspect;
        }
        self
    }

    /// Set the fullscreen padding re-measure delay
    pub fn fullscreen_settle_delay(mut self, delay: Duration) -> Self {
        self.fullscreen_settle_delay = delay;
        self
    }
}
