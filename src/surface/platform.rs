//! Capabilities the controller needs from its host
//!
//! In a browser these map onto the `<video>` element, a `<canvas>` and the
//! document; tests use an in-memory double. All methods take `&self`:
//! implementations are cheap handles, as DOM bindings are.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use crate::error::PlatformError;

/// Future returned by asynchronous platform requests
pub type LocalFuture<T> = Pin<Box<dyn Future<Output = T> + 'static>>;

/// Stable identifier of a surface element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceId(String);

impl SurfaceId {
    /// Create a new identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Width and height in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions are finite and non-zero
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width != 0.0 && self.height != 0.0
    }
}

/// Window and document metrics sampled at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    /// Screen size (falls back to the window's inner size)
    pub window: Size,
    /// Window inner size
    pub inner: Size,
    /// Document element inner size
    pub document: Size,
}

/// How a surface scales its content into its box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectFit {
    /// Keep the aspect ratio, letterbox the rest
    Contain,
    /// Stretch to fill the box
    Fill,
}

/// Axis along which a mirror surface stretches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stretch {
    /// Landscape video: full width, proportional height
    Horizontal,
    /// Portrait video: full height, proportional width
    Vertical,
}

impl Stretch {
    /// Stretch axis for a video of the given intrinsic size
    pub fn for_size(size: Size) -> Self {
        if size.width < size.height {
            Stretch::Vertical
        } else {
            Stretch::Horizontal
        }
    }
}

/// One decoded video frame
///
/// The pixel data is reference counted, so handing a frame to the mirror
/// surface does not copy it.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub data: Bytes,
}

/// Anything that can present video on screen
pub trait Surface {
    /// Stable element identifier
    fn id(&self) -> SurfaceId;

    /// Hide or show the element
    fn set_hidden(&self, hidden: bool);

    /// Declared pixel size (the `width`/`height` attributes)
    fn set_pixel_size(&self, width: f64, height: f64);

    /// Content fit mode
    fn set_object_fit(&self, fit: ObjectFit);

    /// Declared aspect ratio style
    fn set_aspect_ratio(&self, aspect: f64);

    /// Computed CSS height in pixels
    fn computed_height(&self) -> f64;
}

/// The primary video element
pub trait VideoElement: Surface {
    /// Intrinsic video size (`videoWidth` x `videoHeight`)
    fn intrinsic_size(&self) -> Size;

    fn is_paused(&self) -> bool;

    fn is_ended(&self) -> bool;

    /// Frame currently presented, if any
    fn current_frame(&self) -> Option<VideoFrame>;

    /// Layout size including letterbox bars (`offsetWidth` x `offsetHeight`)
    fn offset_size(&self) -> Size;

    /// Rendered bounding box size
    fn bounding_size(&self) -> Size;

    /// Symmetric horizontal padding in pixels
    fn set_horizontal_padding(&self, padding: f64);

    /// Show or hide the native media controls
    fn set_media_controls(&self, visible: bool);

    /// Drop keyboard focus
    fn blur(&self);

    /// Volume in [0, 1]
    fn set_volume(&self, volume: f64);

    fn set_muted(&self, muted: bool);

    /// Poster image shown before playback (`None` clears it)
    fn set_poster(&self, poster: Option<&str>);

    /// Start playback
    fn play(&self) -> LocalFuture<Result<(), PlatformError>>;

    /// Ask for pointer lock on this element
    fn request_pointer_lock(&self) -> LocalFuture<Result<(), PlatformError>>;
}

/// Offscreen-composited surface the video can be mirrored onto
pub trait RenderSurface: Surface {
    /// Axis to stretch along
    fn set_stretch(&self, stretch: Stretch);

    /// Draw a frame at the origin
    fn copy_frame_from(&self, frame: &VideoFrame);
}

/// The host document
pub trait Platform {
    type Video: VideoElement + Clone + 'static;
    type Mirror: RenderSurface + 'static;

    /// The primary video element
    fn video(&self) -> Self::Video;

    /// Create a detached, hidden render surface of the given pixel size
    fn create_surface(&self, id: SurfaceId, width: u32, height: u32) -> Self::Mirror;

    /// Insert `surface` right after `anchor` in display order
    fn attach_after(&self, surface: &Self::Mirror, anchor: &Self::Video);

    /// Remove `surface` from the document
    fn detach(&self, surface: &Self::Mirror);

    /// Current window and document metrics
    fn viewport(&self) -> Viewport;

    /// Enter or leave fullscreen with `target` as the fullscreen element
    fn set_fullscreen(&self, enter: bool, target: &SurfaceId);

    /// Whether the device is touch-first
    fn is_mobile_device(&self) -> bool;
}
