//! Surface state and geometry math
//!
//! Everything here is pure: the controller feeds in measurements taken from
//! the platform and applies the results.

use std::rc::Rc;

use tokio::task::JoinHandle;

use super::platform::{ObjectFit, Size};
use crate::event::payload::{MouseMotion, VideoGeometry};

/// Surface currently presenting video
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSurface {
    /// The video element itself
    PrimaryVideo,
    /// The mirror render surface
    MirrorCanvas,
}

/// A live mirror surface together with the timer feeding it
///
/// The two only exist as a pair. Dropping the session aborts the timer;
/// detaching the surface from the document is up to the owner.
pub struct MirrorSession<M> {
    pub(crate) surface: Rc<M>,
    timer: JoinHandle<()>,
}

impl<M> MirrorSession<M> {
    pub(crate) fn new(surface: Rc<M>, timer: JoinHandle<()>) -> Self {
        Self { surface, timer }
    }

    /// The mirror surface
    pub fn surface(&self) -> &M {
        &self.surface
    }

    /// Whether the copy timer task is still scheduled
    pub fn timer_running(&self) -> bool {
        !self.timer.is_finished()
    }
}

impl<M> Drop for MirrorSession<M> {
    fn drop(&mut self) {
        self.timer.abort();
    }
}

/// State of the rendering surface
///
/// Owned and mutated only by the stream controller.
pub struct SurfaceState<M> {
    /// A fullscreen element is set
    pub fullscreen: bool,

    /// The video element holds the pointer lock
    pub pointer_lock_engaged: bool,

    /// Pointer lock should be taken when entering fullscreen (sticky)
    pub pointer_lock_required: bool,

    /// Tracked display aspect ratio (width / height)
    pub aspect_ratio: f64,

    /// Logical width derived from the last geometry update
    pub logical_width: f64,

    /// Logical height derived from the last geometry update
    pub logical_height: f64,

    /// Raw pointer button handlers are wired
    pub pointer_buttons_wired: bool,

    /// Raw pointer motion handler is wired
    pub pointer_motion_wired: bool,

    pub(crate) mirror: Option<MirrorSession<M>>,

    residual_dx: f64,
    residual_dy: f64,
}

impl<M> SurfaceState<M> {
    /// Create the initial state with the given aspect ratio
    pub fn new(aspect_ratio: f64) -> Self {
        Self {
            fullscreen: false,
            pointer_lock_engaged: false,
            pointer_lock_required: false,
            aspect_ratio,
            logical_width: 0.0,
            logical_height: 0.0,
            pointer_buttons_wired: false,
            pointer_motion_wired: false,
            mirror: None,
            residual_dx: 0.0,
            residual_dy: 0.0,
        }
    }

    /// Which surface presents the video
    pub fn active_surface(&self) -> ActiveSurface {
        if self.mirror.is_some() {
            ActiveSurface::MirrorCanvas
        } else {
            ActiveSurface::PrimaryVideo
        }
    }

    /// The live mirror session, if mirroring
    pub fn mirror(&self) -> Option<&MirrorSession<M>> {
        self.mirror.as_ref()
    }

    /// Sub-pixel motion carried over to the next pointer event
    pub fn residual(&self) -> (f64, f64) {
        (self.residual_dx, self.residual_dy)
    }

    /// Rescale raw pointer deltas into intrinsic video pixels
    ///
    /// `displayed` is the on-screen content size, `intrinsic` the video's
    /// pixel size. The integer part of each scaled delta (plus the carried
    /// residual) is returned and the fractional part is carried to the next
    /// call, so many small moves add up to the same displacement as one
    /// large move. Returns `None` and leaves the residual untouched when
    /// either size is degenerate.
    pub fn scale_motion(
        &mut self,
        dx: f64,
        dy: f64,
        displayed: Size,
        intrinsic: Size,
    ) -> Option<MouseMotion> {
        if !displayed.is_usable() || !intrinsic.is_usable() {
            return None;
        }

        let sx = displayed.width / intrinsic.width;
        let sy = displayed.height / intrinsic.height;

        let raw_x = dx / sx + self.residual_dx;
        let raw_y = dy / sy + self.residual_dy;

        let whole_x = raw_x.trunc();
        let whole_y = raw_y.trunc();

        self.residual_dx = raw_x - whole_x;
        self.residual_dy = raw_y - whole_y;

        Some(MouseMotion::new(whole_x as i32, whole_y as i32))
    }

    /// Forget any carried sub-pixel motion
    pub fn reset_residual(&mut self) {
        self.residual_dx = 0.0;
        self.residual_dy = 0.0;
    }
}

/// On-screen size of the video content
///
/// In fullscreen the element box includes letterbox bars, so only the
/// dimension the browser did not letterbox is trusted and the other one is
/// derived from the aspect ratio. Landscape video keeps its height,
/// portrait video keeps its width. Outside fullscreen the rendered
/// bounding box is used as is.
pub fn displayed_size(
    fullscreen: bool,
    intrinsic: Size,
    offset: Size,
    bounding: Size,
    aspect_ratio: f64,
) -> Size {
    if !fullscreen {
        return bounding;
    }

    if intrinsic.width > intrinsic.height {
        Size::new(offset.height * aspect_ratio, offset.height)
    } else {
        Size::new(offset.width, offset.width / aspect_ratio)
    }
}

/// Fit mode for a new video geometry
///
/// Stretching is only needed when a wide aspect is requested that the
/// pixel size does not already have (compared to 6 decimal places).
pub fn select_fit(geometry: &VideoGeometry) -> ObjectFit {
    let (width, height) = geometry.scaled_size();
    let ratio = width / height;

    if geometry.aspect > 1.0 && !same_to_micro(geometry.aspect, ratio) {
        ObjectFit::Fill
    } else {
        ObjectFit::Contain
    }
}

fn same_to_micro(a: f64, b: f64) -> bool {
    (a * 1e6).round() == (b * 1e6).round()
}

/// Horizontal padding that centers the video in fullscreen
///
/// Negative results are clamped to zero.
pub fn fullscreen_padding(window: f64, document: f64, aspect_ratio: f64) -> f64 {
    ((window - document * aspect_ratio) / 2.0).max(0.0)
}
