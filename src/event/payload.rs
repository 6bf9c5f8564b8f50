//! Payload types carried by bus topics

/// Relative pointer motion, in intrinsic video pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseMotion {
    /// Horizontal displacement
    pub dx: i32,
    /// Vertical displacement
    pub dy: i32,
}

impl MouseMotion {
    /// Create a new motion event
    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

/// Pointer button state change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MousePress {
    /// Button index as reported by the platform (0 = primary)
    pub button: i16,
    /// Whether the button went down
    pub pressed: bool,
}

/// Geometry of the video produced by the remote app
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoGeometry {
    /// Frame width in pixels
    pub width: f64,
    /// Frame height in pixels
    pub height: f64,
    /// Display aspect ratio the app wants (width / height)
    pub aspect: f64,
    /// Optional pixel scale factor (1 when absent)
    pub scale: Option<f64>,
}

impl VideoGeometry {
    /// Create a geometry without a scale factor
    pub fn new(width: f64, height: f64, aspect: f64) -> Self {
        Self {
            width,
            height,
            aspect,
            scale: None,
        }
    }

    /// Set the pixel scale factor
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Effective pixel dimensions after scaling
    ///
    /// A missing or zero scale counts as 1.
    pub fn scaled_size(&self) -> (f64, f64) {
        let scale = match self.scale {
            Some(s) if s != 0.0 => s,
            _ => 1.0,
        };
        (self.width * scale, self.height * scale)
    }
}

/// Keyboard key event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyEvent {
    /// Logical key name
    pub key: String,
}

/// Gamepad axis movement
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisChange {
    /// Axis index
    pub id: u8,
    /// Axis position in [-1, 1]
    pub value: f64,
}
