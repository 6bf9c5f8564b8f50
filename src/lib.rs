//! Presentation layer of a game-streaming client
//!
//! This crate provides:
//! - An ordered, topic-based event bus that every module of the client
//!   uses to talk to the others
//! - The video surface controller: fullscreen and pointer-lock handling,
//!   the mirror compositing loop and relative pointer scaling
//!
//! The browser (or any other host) is reached only through the traits in
//! [`surface::platform`], so the controller runs against in-memory doubles
//! as well as against a real document.
//!
//! # Example
//! ```no_run
//! use stream_view::event::{topic, EventBus};
//!
//! let bus = EventBus::new();
//! let sub = bus.subscribe(topic::MOUSE_MOVED, |motion| {
//!     println!("moved by {}x{}", motion.dx, motion.dy);
//!     Ok(())
//! });
//! # let _ = sub;
//! ```

pub mod error;
pub mod event;
pub mod stream;
pub mod surface;

pub use error::{Error, Result};
pub use event::{EventBus, Subscription, Topic};
pub use stream::{MirrorMode, Settings, StreamConfig, StreamController};
