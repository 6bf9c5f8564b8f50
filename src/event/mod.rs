//! Process-wide publish/subscribe event bus
//!
//! The bus is the only channel modules use to talk to each other. Producers
//! (input devices, the connection layer, the settings panel) publish on a
//! [`Topic`]; consumers subscribe to it without knowing who publishes.
//!
//! # Delivery order
//!
//! ```text
//!   subscribe(order = 5)  ──► key (5, 0)
//!   subscribe(order = 1)  ──► key (1, 1)        publish ──► (0, 3)
//!   subscribe(order = 5)  ──► key (5, 2)                    (1, 1)
//!   subscribe()           ──► key (0, 3)                    (5, 0)
//!                                                           (5, 2)
//! ```
//!
//! Listeners are sorted by `(order, sequence)`: the optional order key
//! first (absent means 0), then the order in which they subscribed.
//!
//! Each topic carries exactly one payload type, so a listener can never
//! receive a payload shaped for another topic.

pub mod bus;
pub mod payload;
pub mod topic;

pub use bus::{EventBus, Subscription};
pub use payload::{AxisChange, KeyEvent, MouseMotion, MousePress, VideoGeometry};
pub use topic::Topic;
