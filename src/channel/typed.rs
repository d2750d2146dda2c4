//! # Typed notification channel.
//!
//! [`NotificationChannel<T, K>`] is a named topic carrying values of type `T`.
//! Subscribers register one handler each under a key `K`; `post` wraps the
//! value in a [`Payload`] and sends it through the [`Bus`] under the channel's
//! name. The channel's own listener unwraps it and fans it out.
//!
//! ## Lifecycle
//! ```text
//!              subscribe (first)                 unsubscribe (last) / unsubscribe_all / drop
//!  Detached ───────────────────────► Attached ───────────────────────────────────────────► Detached
//!                                     │   ▲
//!                                     └───┘ subscribe / unsubscribe leaving handlers behind
//! ```
//!
//! ## Rules
//! - Attached to the bus **iff** at least one handler is registered.
//! - One handler per key; subscribing an existing key replaces its handler.
//! - `post` never adds or removes handlers.
//! - No lock is held while handlers run: handlers may subscribe, unsubscribe
//!   or post (on this channel or others).
//! - Dropping the channel detaches it; nothing on the bus outlives it.

use std::any::type_name;
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, trace};

use super::handlers::{Delivery, Handler, HandlerSet, fan_out};
use crate::bus::{Bus, Listener, ListenerId, NotificationBus, Payload};
use crate::config::Config;
use crate::error::DeliveryError;

/// Whether a channel is currently registered on its bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// No handlers; not registered.
    Detached,
    /// At least one handler; the channel's listener is registered under its name.
    Attached,
}

/// Handler map plus the attach flag, guarded together.
struct Subscriptions<T, K> {
    handlers: HandlerSet<T, K>,
    attached: bool,
}

/// State shared between the channel handle and the listener on the bus.
struct Shared<T, K> {
    name: Arc<str>,
    id: ListenerId,
    bus: Arc<dyn Bus>,
    config: Config,
    subs: RwLock<Subscriptions<T, K>>,
}

impl<T: 'static, K: Hash + Eq + Send + Sync + 'static> Shared<T, K> {
    fn read(&self) -> RwLockReadGuard<'_, Subscriptions<T, K>> {
        self.subs.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Subscriptions<T, K>> {
        self.subs.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn deliver(&self, payload: &Payload) -> Result<Delivery, DeliveryError> {
        let Some(value) = payload.downcast_ref::<T>() else {
            return Err(DeliveryError::TypeMismatch {
                topic: Arc::clone(&self.name),
                expected: type_name::<T>(),
                actual: payload.type_name(),
            });
        };
        let handlers = self.read().handlers.snapshot();
        Ok(fan_out(
            &self.name,
            &handlers,
            value,
            self.config.isolate_handlers,
        ))
    }
}

impl<T: 'static, K: Hash + Eq + Send + Sync + 'static> Listener for Shared<T, K> {
    fn receive(&self, _topic: &str, payload: &Payload) {
        match self.deliver(payload) {
            Ok(delivery) if !delivery.is_clean() => {
                debug!(
                    topic = %self.name,
                    invoked = delivery.invoked,
                    panicked = delivery.panicked,
                    "delivery incomplete"
                );
            }
            Ok(_) => {}
            Err(err) => self.config.on_mismatch.apply(&err),
        }
    }
}

/// Named publish/subscribe topic for values of type `T`.
///
/// `K` is the subscriber key: any hashable identity, `String` by default.
///
/// ### Example
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use notichan::{NotificationBus, NotificationChannel};
///
/// let bus = Arc::new(NotificationBus::new());
/// let volume: NotificationChannel<u32> = NotificationChannel::with_bus("volume", bus.clone());
///
/// let last = Arc::new(AtomicU32::new(0));
/// let sink = Arc::clone(&last);
/// volume.subscribe("mixer", move |v: &u32| sink.store(*v, Ordering::SeqCst));
///
/// volume.post(42);
/// assert_eq!(last.load(Ordering::SeqCst), 42);
///
/// drop(volume);
/// assert!(bus.is_empty());
/// ```
pub struct NotificationChannel<T: 'static, K: Hash + Eq + Send + Sync + 'static = String> {
    shared: Arc<Shared<T, K>>,
}

impl<T: 'static, K: Hash + Eq + Send + Sync + 'static> NotificationChannel<T, K> {
    /// Creates a channel on the process-wide bus. Nothing is attached yet.
    ///
    /// Channels sharing a name receive each other's posts; keep names unique
    /// per topic, or at least per value type.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self::with_bus(name, NotificationBus::global())
    }

    /// Creates a channel on the given bus with the default [`Config`].
    pub fn with_bus(name: impl Into<Arc<str>>, bus: Arc<dyn Bus>) -> Self {
        Self::with_config(name, bus, Config::default())
    }

    /// Creates a channel on the given bus with an explicit [`Config`].
    pub fn with_config(name: impl Into<Arc<str>>, bus: Arc<dyn Bus>, config: Config) -> Self {
        Self {
            shared: Arc::new(Shared {
                name: name.into(),
                id: ListenerId::next(),
                bus,
                config,
                subs: RwLock::new(Subscriptions {
                    handlers: HandlerSet::new(),
                    attached: false,
                }),
            }),
        }
    }

    /// Topic name on the bus.
    #[inline]
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Id under which this channel's listener attaches to the bus.
    #[inline]
    pub fn listener_id(&self) -> ListenerId {
        self.shared.id
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    /// True if at least one handler is registered.
    pub fn is_subscribed(&self) -> bool {
        !self.shared.read().handlers.is_empty()
    }

    /// Number of registered handlers.
    pub fn subscriber_count(&self) -> usize {
        self.shared.read().handlers.len()
    }

    pub fn state(&self) -> ChannelState {
        if self.shared.read().attached {
            ChannelState::Attached
        } else {
            ChannelState::Detached
        }
    }

    /// Registers `handler` under `key`, replacing any handler the key already had.
    ///
    /// The first subscription attaches the channel to its bus.
    pub fn subscribe<F>(&self, key: impl Into<K>, handler: F)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let handler: Handler<T> = Arc::new(handler);
        self.subscribe_with(key, Some(handler));
    }

    /// Registers `handler` under `key`, or unsubscribes `key` when `handler` is `None`.
    pub fn subscribe_with(&self, key: impl Into<K>, handler: Option<Handler<T>>) {
        let key = key.into();
        let Some(handler) = handler else {
            self.unsubscribe(&key);
            return;
        };

        let shared = &self.shared;
        let mut subs = shared.write();
        if !subs.attached {
            let listener = Arc::clone(shared) as Arc<dyn Listener>;
            shared.bus.attach(shared.id, &shared.name, listener);
            subs.attached = true;
            debug!(topic = %shared.name, listener = %shared.id, "channel attached");
        }
        let replaced = subs.handlers.insert(key, handler);
        trace!(
            topic = %shared.name,
            replaced,
            subscribers = subs.handlers.len(),
            "handler registered"
        );
    }

    /// Posts `value` to every channel listening under this name.
    ///
    /// Runs synchronously: when this returns, every handler has been called.
    /// Returns the number of bus listeners reached (channels, not handlers).
    ///
    /// # Panics
    /// Under [`MismatchPolicy::Panic`](crate::MismatchPolicy::Panic), a channel
    /// of another value type sharing this name panics on receipt, and the panic
    /// unwinds out of this call. The same holds for a panicking handler when
    /// isolation is off.
    pub fn post(&self, value: T) -> usize {
        let payload = Payload::new(value);
        self.shared.bus.post(&self.shared.name, &payload)
    }

    /// Unwraps `payload` as `T` and invokes every registered handler with it.
    ///
    /// This is the receive path the bus drives. It does not apply the
    /// mismatch policy; the caller decides what an error means.
    ///
    /// # Errors
    /// [`DeliveryError::TypeMismatch`] if the payload does not hold a `T`.
    pub fn deliver(&self, payload: &Payload) -> Result<Delivery, DeliveryError> {
        self.shared.deliver(payload)
    }

    /// Removes the handler for `key`, if any. Detaches when none remain.
    pub fn unsubscribe<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let shared = &self.shared;
        let mut subs = shared.write();
        let removed = subs.handlers.remove(key);
        if subs.handlers.is_empty() && subs.attached {
            shared.bus.detach(shared.id);
            subs.attached = false;
            debug!(topic = %shared.name, listener = %shared.id, "channel detached");
        }
        trace!(topic = %shared.name, removed, "handler unregistered");
    }

    /// Removes every handler and detaches from the bus.
    pub fn unsubscribe_all(&self) {
        let shared = &self.shared;
        let mut subs = shared.write();
        let cleared = subs.handlers.clear();
        shared.bus.detach(shared.id);
        if subs.attached {
            debug!(topic = %shared.name, listener = %shared.id, cleared, "channel detached");
        }
        subs.attached = false;
    }
}

impl<T: 'static, K: Hash + Eq + Send + Sync + 'static> Drop for NotificationChannel<T, K> {
    fn drop(&mut self) {
        self.unsubscribe_all();
    }
}

impl<T: 'static, K: Hash + Eq + Send + Sync + 'static> fmt::Debug for NotificationChannel<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationChannel")
            .field("name", &self.name())
            .field("value_type", &type_name::<T>())
            .field("listener", &self.shared.id)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
