//! Event bus implementation
//!
//! Single-threaded registry of listeners. Publishing is synchronous: every
//! live listener of the topic runs before `publish` returns, including any
//! nested publishes those listeners make.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use super::topic::{Topic, TopicKey};
use crate::error::Result;

type Listener = Rc<dyn Fn(&dyn Any) -> Result<()>>;

/// A registered listener
struct Entry {
    /// Caller-provided order key (0 when absent)
    order: i32,
    /// Subscribe-time sequence number, tie-breaker within one order key
    seq: u64,
    listener: Listener,
}

impl Entry {
    fn sort_key(&self) -> (i32, u64) {
        (self.order, self.seq)
    }
}

#[derive(Default)]
struct Registry {
    /// Live listeners per topic, kept sorted by `(order, seq)`
    topics: HashMap<TopicKey, Vec<Entry>>,
    /// Next sequence number to hand out
    next_seq: u64,
}

impl Registry {
    fn insert(&mut self, key: TopicKey, order: i32, listener: Listener) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;

        let entries = self.topics.entry(key).or_default();
        let pos = entries.partition_point(|e| e.sort_key() < (order, seq));
        entries.insert(
            pos,
            Entry {
                order,
                seq,
                listener,
            },
        );
        seq
    }

    fn remove(&mut self, key: &TopicKey, seq: u64) -> bool {
        let Some(entries) = self.topics.get_mut(key) else {
            return false;
        };
        let Some(pos) = entries.iter().position(|e| e.seq == seq) else {
            return false;
        };
        entries.remove(pos);
        if entries.is_empty() {
            self.topics.remove(key);
        }
        true
    }

    fn contains(&self, key: &TopicKey, seq: u64) -> bool {
        self.topics
            .get(key)
            .is_some_and(|entries| entries.iter().any(|e| e.seq == seq))
    }

    fn snapshot(&self, key: &TopicKey) -> Vec<(u64, Listener)> {
        self.topics
            .get(key)
            .map(|entries| {
                entries
                    .iter()
                    .map(|e| (e.seq, Rc::clone(&e.listener)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Topic-keyed publish/subscribe bus
///
/// Cloning is cheap and every clone refers to the same registry. Construct
/// one per application (or per test) and hand clones to the components
/// that need it.
///
/// # Example
/// ```
/// use stream_view::event::{topic, EventBus, MousePress};
///
/// let bus = EventBus::new();
/// let sub = bus.subscribe(topic::MOUSE_PRESSED, |press| {
///     assert!(press.pressed);
///     Ok(())
/// });
///
/// bus.publish(topic::MOUSE_PRESSED, MousePress { button: 0, pressed: true })?;
/// sub.unsubscribe();
/// # Ok::<(), stream_view::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Rc<RefCell<Registry>>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a topic with the default order key (0)
    pub fn subscribe<T, F>(&self, topic: Topic<T>, listener: F) -> Subscription
    where
        T: 'static,
        F: Fn(&T) -> Result<()> + 'static,
    {
        self.register(topic, None, listener)
    }

    /// Subscribe to a topic with an explicit order key
    ///
    /// Lower keys run first; listeners sharing a key run in subscription
    /// order.
    pub fn subscribe_ordered<T, F>(&self, topic: Topic<T>, order: i32, listener: F) -> Subscription
    where
        T: 'static,
        F: Fn(&T) -> Result<()> + 'static,
    {
        self.register(topic, Some(order), listener)
    }

    fn register<T, F>(&self, topic: Topic<T>, order: Option<i32>, listener: F) -> Subscription
    where
        T: 'static,
        F: Fn(&T) -> Result<()> + 'static,
    {
        let key = topic.key();
        let erased: Listener = Rc::new(move |data: &dyn Any| match data.downcast_ref::<T>() {
            Some(data) => listener(data),
            // Unreachable: the key pins the payload type
            None => Ok(()),
        });

        let seq = self
            .registry
            .borrow_mut()
            .insert(key, order.unwrap_or(0), erased);

        tracing::trace!(topic = key.name, seq = seq, order = ?order, "Listener subscribed");

        Subscription {
            registry: Rc::downgrade(&self.registry),
            key,
            seq,
        }
    }

    /// Publish `data` to every live listener of `topic`
    ///
    /// Listeners run in `(order, sequence)` order. The first listener error
    /// is returned immediately and the remaining listeners are skipped for
    /// this call. Listeners cancelled while the publish is in progress are
    /// not invoked; listeners added while it is in progress wait for the
    /// next publish.
    pub fn publish<T: 'static>(&self, topic: Topic<T>, data: T) -> Result<()> {
        let key = topic.key();

        // The registry borrow must be released before any listener runs so
        // listeners can subscribe, unsubscribe and publish themselves.
        let listeners = self.registry.borrow().snapshot(&key);
        if listeners.is_empty() {
            return Ok(());
        }

        for (seq, listener) in listeners {
            if !self.registry.borrow().contains(&key, seq) {
                continue;
            }
            listener(&data as &dyn Any)?;
        }

        Ok(())
    }

    /// Publish a topic without a payload
    ///
    /// Listeners receive the payload type's default value.
    pub fn notify<T: Default + 'static>(&self, topic: Topic<T>) -> Result<()> {
        self.publish(topic, T::default())
    }

    /// Number of live listeners on a topic
    pub fn subscriber_count<T: 'static>(&self, topic: Topic<T>) -> usize {
        self.registry
            .borrow()
            .topics
            .get(&topic.key())
            .map_or(0, Vec::len)
    }
}

/// Handle to a registered listener
///
/// Dropping the handle does not cancel the subscription; call
/// [`Subscription::unsubscribe`]. A handle that outlives its bus is inert.
#[derive(Debug)]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    key: TopicKey,
    seq: u64,
}

impl Subscription {
    /// Cancel the subscription
    ///
    /// Only this subscription is removed. Calling it again is a no-op.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            if registry.borrow_mut().remove(&self.key, self.seq) {
                tracing::trace!(topic = self.key.name, seq = self.seq, "Listener unsubscribed");
            }
        }
    }

    /// Whether the listener still receives events
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.borrow().contains(&self.key, self.seq))
    }

    /// Name of the subscribed topic
    pub fn topic(&self) -> &'static str {
        self.key.name
    }
}
