//! Settings snapshot shared over the bus

use std::fmt;
use std::str::FromStr;

/// How the video is presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MirrorMode {
    /// Present the video element directly
    #[default]
    None,
    /// Copy frames onto a separate render surface
    Mirror,
}

impl MirrorMode {
    /// Stored setting value
    pub fn as_str(&self) -> &'static str {
        match self {
            MirrorMode::None => "none",
            MirrorMode::Mirror => "mirror",
        }
    }

    pub fn is_mirror(&self) -> bool {
        *self == MirrorMode::Mirror
    }
}

impl fmt::Display for MirrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown mirror mode value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMirrorModeError(String);

impl fmt::Display for ParseMirrorModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown mirror mode: {}", self.0)
    }
}

impl std::error::Error for ParseMirrorModeError {}

impl FromStr for MirrorMode {
    type Err = ParseMirrorModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(MirrorMode::None),
            "mirror" => Ok(MirrorMode::Mirror),
            other => Err(ParseMirrorModeError(other.to_string())),
        }
    }
}

/// The settings this layer reads
///
/// Published in full on every settings change. The defaults are the values
/// used when nothing has been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Presentation mode
    pub mirror_mode: MirrorMode,

    /// Initial media volume, 0 to 100
    pub volume_percent: u8,

    /// Request fullscreen on load (ignored on touch devices)
    pub force_fullscreen: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mirror_mode: MirrorMode::None,
            volume_percent: 50,
            force_fullscreen: false,
        }
    }
}

impl Settings {
    /// Volume as a [0, 1] fraction
    pub fn volume(&self) -> f64 {
        f64::from(self.volume_percent.min(100)) / 100.0
    }

    /// Set the mirror mode
    pub fn mirror_mode(mut self, mode: MirrorMode) -> Self {
        self.mirror_mode = mode;
        self
    }

    /// Set the volume percentage (capped at 100)
    pub fn volume_percent(mut self, percent: u8) -> Self {
        self.volume_percent = percent.min(100);
        self
    }

    /// Set the force-fullscreen flag
    pub fn force_fullscreen(mut self, force: bool) -> Self {
        self.force_fullscreen = force;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.mirror_mode, MirrorMode::None);
        assert_eq!(settings.volume_percent, 50);
        assert!(!settings.force_fullscreen);
        assert_eq!(settings.volume(), 0.5);
    }

    #[test]
    fn test_parse_mirror_mode() {
        assert_eq!("none".parse::<MirrorMode>(), Ok(MirrorMode::None));
        assert_eq!("mirror".parse::<MirrorMode>(), Ok(MirrorMode::Mirror));
        assert!("crt".parse::<MirrorMode>().is_err());
        assert_eq!(MirrorMode::Mirror.to_string(), "mirror");
    }

    #[test]
    fn test_builder_chaining() {
        let settings = Settings::default()
            .mirror_mode(MirrorMode::Mirror)
            .volume_percent(250)
            .force_fullscreen(true);

        assert!(settings.mirror_mode.is_mirror());
        assert_eq!(settings.volume_percent, 100);
        assert_eq!(settings.volume(), 1.0);
        assert!(settings.force_fullscreen);
    }
}
