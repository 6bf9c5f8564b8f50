//! Typed topics and the application topic catalogue
//!
//! A [`Topic`] pairs a name with the payload type it carries. The bus keys
//! its registry on both, so publishing the wrong payload shape for a topic
//! does not compile.

use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;

use super::payload::{AxisChange, KeyEvent, MouseMotion, MousePress, VideoGeometry};
use crate::stream::settings::Settings;
use crate::surface::platform::SurfaceId;

/// Named event category carrying payloads of type `T`
pub struct Topic<T> {
    name: &'static str,
    payload: PhantomData<fn() -> T>,
}

impl<T> Topic<T> {
    /// Declare a topic
    ///
    /// The name must not be empty; for `const` topics this is checked at
    /// compile time.
    pub const fn new(name: &'static str) -> Self {
        assert!(!name.is_empty(), "topic name must not be empty");
        Self {
            name,
            payload: PhantomData,
        }
    }

    /// Topic name
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: 'static> Topic<T> {
    pub(crate) fn key(&self) -> TopicKey {
        TopicKey {
            name: self.name,
            payload: TypeId::of::<T>(),
        }
    }
}

impl<T> Clone for Topic<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Topic<T> {}

impl<T> fmt::Debug for Topic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Topic").field(&self.name).finish()
    }
}

impl<T> fmt::Display for Topic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Registry key: topic name plus payload type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TopicKey {
    pub(crate) name: &'static str,
    payload: TypeId,
}

// Server selection

/// A latency check against the worker list was requested
pub const LATENCY_CHECK_REQUESTED: Topic<()> = Topic::new("latency-check-requested");
/// Ping the server (request id)
pub const PING_REQUEST: Topic<String> = Topic::new("ping-request");
/// Ping reply (request id)
pub const PING_RESPONSE: Topic<String> = Topic::new("ping-response");
/// Worker addresses were fetched
pub const WORKER_LIST_FETCHED: Topic<Vec<String>> = Topic::new("worker-list-fetched");

// Game session

/// A game room became available (room id)
pub const GAME_ROOM_AVAILABLE: Topic<String> = Topic::new("game-room-available");
/// The running game was saved
pub const GAME_SAVED: Topic<()> = Topic::new("game-saved");
/// A saved game was loaded
pub const GAME_LOADED: Topic<()> = Topic::new("game-loaded");
/// The user picked a player slot
pub const GAME_PLAYER_IDX: Topic<u8> = Topic::new("game-player-index");
/// The server confirmed the player slot
pub const GAME_PLAYER_IDX_SET: Topic<u8> = Topic::new("game-player-index-set");
/// The room has no free player slots
pub const GAME_ERROR_NO_FREE_SLOTS: Topic<()> = Topic::new("game-no-free-slots");

// Connection

/// The peer connection was closed
pub const WEBRTC_CONNECTION_CLOSED: Topic<()> = Topic::new("webrtc-connection-closed");
/// The peer connection is ready for media
pub const WEBRTC_CONNECTION_READY: Topic<()> = Topic::new("webrtc-connection-ready");
/// A new peer connection is being negotiated
pub const WEBRTC_NEW_CONNECTION: Topic<()> = Topic::new("webrtc-new-connection");
/// Buffered ICE candidates should be sent
pub const WEBRTC_ICE_CANDIDATES_FLUSH: Topic<()> = Topic::new("webrtc-ice-candidates-flush");
/// Free-form status message for the user
pub const MESSAGE: Topic<String> = Topic::new("message");

// Input devices

/// A gamepad was plugged in
pub const GAMEPAD_CONNECTED: Topic<()> = Topic::new("gamepad-connected");
/// A gamepad was removed
pub const GAMEPAD_DISCONNECTED: Topic<()> = Topic::new("gamepad-disconnected");
/// Menu handlers were attached
pub const MENU_HANDLER_ATTACHED: Topic<()> = Topic::new("menu-handler-attached");
/// Menu key went down
pub const MENU_PRESSED: Topic<KeyEvent> = Topic::new("menu-pressed");
/// Menu key went up
pub const MENU_RELEASED: Topic<KeyEvent> = Topic::new("menu-released");
/// Mapped game key went down
pub const KEY_PRESSED: Topic<KeyEvent> = Topic::new("key-pressed");
/// Mapped game key went up
pub const KEY_RELEASED: Topic<KeyEvent> = Topic::new("key-released");
/// Toggle key filtering for the raw keyboard
pub const KEYBOARD_TOGGLE_FILTER_MODE: Topic<()> = Topic::new("keyboard-toggle-filter-mode");
/// Raw keyboard key press
pub const KEYBOARD_KEY_PRESSED: Topic<KeyEvent> = Topic::new("keyboard-key-pressed");
/// Raw keyboard key down
pub const KEYBOARD_KEY_DOWN: Topic<KeyEvent> = Topic::new("keyboard-key-down");
/// Raw keyboard key up
pub const KEYBOARD_KEY_UP: Topic<KeyEvent> = Topic::new("keyboard-key-up");
/// Gamepad or virtual stick axis moved
pub const AXIS_CHANGED: Topic<AxisChange> = Topic::new("axis-changed");
/// Controller state should be sent to the server
pub const CONTROLLER_UPDATED: Topic<()> = Topic::new("controller-updated");
/// Relative pointer motion in video pixels
pub const MOUSE_MOVED: Topic<MouseMotion> = Topic::new("mouse-moved");
/// Pointer button state change
pub const MOUSE_PRESSED: Topic<MousePress> = Topic::new("mouse-pressed");
/// Keyboard and mouse should be locked while fullscreen (one-shot latch)
pub const KB_MOUSE_FLAG: Topic<()> = Topic::new("kb-mouse-flag");

// Presentation

/// Fullscreen element changed (`None` when fullscreen was left)
pub const FULLSCREEN_CHANGE: Topic<Option<SurfaceId>> = Topic::new("fullscreen-change");
/// Pointer lock element changed (`None` when the lock was released)
pub const POINTER_LOCK_CHANGE: Topic<Option<SurfaceId>> = Topic::new("pointer-lock-change");
/// The remote app changed its video geometry
pub const APP_VIDEO_CHANGED: Topic<VideoGeometry> = Topic::new("app-video-changed");
/// Virtual d-pad visibility toggled
pub const DPAD_TOGGLE: Topic<bool> = Topic::new("dpad-toggle");
/// Stats overlay toggled
pub const STATS_TOGGLE: Topic<()> = Topic::new("stats-toggle");
/// Help overlay shown or hidden
pub const HELP_OVERLAY_TOGGLED: Topic<bool> = Topic::new("help-overlay-toggled");

// Settings and recording

/// Settings were changed (full snapshot)
pub const SETTINGS_CHANGED: Topic<Settings> = Topic::new("settings-changed");
/// Recording was switched on or off by the user
pub const RECORDING_TOGGLED: Topic<bool> = Topic::new("recording-toggled");
/// The server reported a recording status change
pub const RECORDING_STATUS_CHANGED: Topic<bool> = Topic::new("recording-status-changed");
