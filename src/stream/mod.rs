//! Video stream presentation
//!
//! [`StreamController`] owns the rendering surface. It listens on the event
//! bus for fullscreen, pointer lock, settings and geometry notifications,
//! receives media lifecycle callbacks from the host and publishes pointer
//! input scaled to video pixels.
//!
//! ```text
//!   bus ──FULLSCREEN_CHANGE──►┐
//!   bus ──POINTER_LOCK_CHANGE►│                    ┌─► <video>
//!   bus ──APP_VIDEO_CHANGED──►├─ StreamController ─┤
//!   bus ──SETTINGS_CHANGED───►│                    └─► mirror surface
//!   bus ──KB_MOUSE_FLAG──────►┘         │
//!                                       └──MOUSE_MOVED / MOUSE_PRESSED──► bus
//! ```

pub mod config;
pub mod controller;
pub mod mirror;
pub mod settings;

pub use config::StreamConfig;
pub use controller::StreamController;
pub use mirror::MIRROR_SURFACE_ID;
pub use settings::{MirrorMode, ParseMirrorModeError, Settings};
