//! Rendering surface model
//!
//! This module provides:
//! - The platform capability traits the controller renders through
//! - Surface state (fullscreen, pointer lock, mirror session, motion residual)
//! - Geometry helpers for letterboxing and pointer scaling
//! - Media fault classification

pub mod media;
pub mod platform;
pub mod state;

#[cfg(test)]
pub(crate) mod fake;

pub use media::MediaError;
pub use platform::{
    LocalFuture, ObjectFit, Platform, RenderSurface, Size, Stretch, Surface, SurfaceId,
    VideoElement, VideoFrame, Viewport,
};
pub use state::{ActiveSurface, MirrorSession, SurfaceState};
