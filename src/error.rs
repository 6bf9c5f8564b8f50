//! Error types
//!
//! Nothing here is fatal: platform rejections degrade a feature, media
//! faults are reported and listener errors end a single publish call.

use std::fmt;

/// Crate-wide error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The host platform refused or failed an operation
    Platform(PlatformError),
    /// A controller handler ran while the controller was already borrowed
    /// (a platform call re-entered the controller synchronously)
    ControllerBusy,
    /// A bus listener failed
    Listener(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Platform(err) => write!(f, "Platform error: {}", err),
            Error::ControllerBusy => write!(f, "Stream controller is busy"),
            Error::Listener(msg) => write!(f, "Listener failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Platform(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PlatformError> for Error {
    fn from(err: PlatformError) -> Self {
        Error::Platform(err)
    }
}

/// Failures reported by asynchronous platform requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The user or the browser denied the pointer lock request
    PointerLockDenied,
    /// Pointer lock is not available on this platform
    PointerLockUnsupported,
    /// Media playback could not be started (e.g. autoplay policy)
    PlaybackRejected(String),
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::PointerLockDenied => write!(f, "Pointer lock denied"),
            PlatformError::PointerLockUnsupported => write!(f, "Pointer lock unsupported"),
            PlatformError::PlaybackRejected(reason) => {
                write!(f, "Playback rejected: {}", reason)
            }
        }
    }
}

impl std::error::Error for PlatformError {}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::from(PlatformError::PlaybackRejected("autoplay".into()));
        assert_eq!(err.to_string(), "Platform error: Playback rejected: autoplay");
        assert_eq!(Error::ControllerBusy.to_string(), "Stream controller is busy");
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;

        let err = Error::Platform(PlatformError::PointerLockDenied);
        assert!(err.source().is_some());
        assert!(Error::Listener("boom".into()).source().is_none());
    }
}
