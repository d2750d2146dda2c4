//! # Channel contract as a trait.
//!
//! [`Notify`] is the subscribe / post surface of a channel, so code that only
//! publishes or listens can take `&impl Notify` and be handed a test double.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use notichan::{NotificationBus, NotificationChannel, Notify};
//!
//! fn announce<N: Notify<Value = String>>(channel: &N, who: &str) {
//!     channel.post(format!("{who} joined"));
//! }
//!
//! let bus = Arc::new(NotificationBus::new());
//! let lobby: NotificationChannel<String> = NotificationChannel::with_bus("lobby", bus);
//! announce(&lobby, "ana");
//! ```

use std::hash::Hash;

use super::NotificationChannel;
use super::handlers::Handler;

/// Subscribe / unsubscribe / post surface of a notification channel.
pub trait Notify {
    /// Value type carried by the channel.
    type Value;
    /// Subscriber key type.
    type Key;

    /// True if at least one handler is registered.
    fn is_subscribed(&self) -> bool;

    /// Registers `handler` under `key`, or unsubscribes `key` when `handler` is `None`.
    fn subscribe_with(&self, key: Self::Key, handler: Option<Handler<Self::Value>>);

    /// Posts `value` to every handler listening on the channel's topic.
    fn post(&self, value: Self::Value);

    /// Removes the handler registered under `key`, if any.
    fn unsubscribe(&self, key: &Self::Key);

    /// Removes every handler.
    fn unsubscribe_all(&self);
}

impl<T: 'static, K: Hash + Eq + Send + Sync + 'static> Notify for NotificationChannel<T, K> {
    type Value = T;
    type Key = K;

    fn is_subscribed(&self) -> bool {
        NotificationChannel::is_subscribed(self)
    }

    fn subscribe_with(&self, key: K, handler: Option<Handler<T>>) {
        NotificationChannel::subscribe_with(self, key, handler);
    }

    fn post(&self, value: T) {
        NotificationChannel::post(self, value);
    }

    fn unsubscribe(&self, key: &K) {
        NotificationChannel::unsubscribe(self, key);
    }

    fn unsubscribe_all(&self) {
        NotificationChannel::unsubscribe_all(self);
    }
}
