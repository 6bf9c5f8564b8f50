//! Media playback fault classification
//!
//! Faults are reported for diagnostics only. Nothing here retries or
//! resumes playback.

use std::fmt;

/// Playback fault reported by the video element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaError {
    /// The user aborted the fetch
    Aborted,
    /// The download failed part-way
    Network,
    /// The stream was corrupt or used unsupported features
    Decode,
    /// The source could not be loaded at all
    SourceNotSupported,
    /// Any other code
    Unknown(u16),
}

impl MediaError {
    /// Classify a platform media error code
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => MediaError::Aborted,
            2 => MediaError::Network,
            3 => MediaError::Decode,
            4 => MediaError::SourceNotSupported,
            other => MediaError::Unknown(other),
        }
    }

    /// Numeric code as reported by the platform
    pub fn code(&self) -> u16 {
        match self {
            MediaError::Aborted => 1,
            MediaError::Network => 2,
            MediaError::Decode => 3,
            MediaError::SourceNotSupported => 4,
            MediaError::Unknown(code) => *code,
        }
    }

    /// Diagnostic message for the user-facing log
    pub fn message(&self) -> &'static str {
        match self {
            MediaError::Aborted => "You aborted the video playback.",
            MediaError::Network => {
                "A network error caused the video download to fail part-way."
            }
            MediaError::Decode => {
                "The video playback was aborted due to a corruption problem or because the video used features your browser did not support."
            }
            MediaError::SourceNotSupported => {
                "The video could not be loaded, either because the server or network failed or because the format is not supported."
            }
            MediaError::Unknown(_) => "An unknown video error occurred.",
        }
    }
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for MediaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(MediaError::from_code(1), MediaError::Aborted);
        assert_eq!(MediaError::from_code(2), MediaError::Network);
        assert_eq!(MediaError::from_code(3), MediaError::Decode);
        assert_eq!(MediaError::from_code(4), MediaError::SourceNotSupported);
        assert_eq!(MediaError::from_code(0), MediaError::Unknown(0));
        assert_eq!(MediaError::from_code(99).code(), 99);
    }

    #[test]
    fn test_messages_are_distinct() {
        let all = [
            MediaError::Aborted,
            MediaError::Network,
            MediaError::Decode,
            MediaError::SourceNotSupported,
            MediaError::Unknown(7),
        ];

        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.message(), b.message());
            }
        }
    }
}
