//! # Keyed handler set with isolated fan-out.
//!
//! [`HandlerSet`] maps subscriber keys to handlers, one handler per key.
//! [`fan_out`] invokes a snapshot of those handlers with one value.
//!
//! ## Diagram
//! ```text
//!    fan_out(&value)
//!        │
//!        ├──► handler k1(&value)
//!        ├──► handler k2(&value) ── panic → caught, logged, counted
//!        └──► handler kN(&value)
//! ```
//!
//! ## Panic handling
//! With isolation on, each call runs under `catch_unwind`:
//! - the panic message is logged with the topic
//! - the remaining handlers still run
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state
//! inconsistent if a handler panics while holding a lock of its own.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::error;

/// Callback invoked with every value posted on a channel.
pub type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Outcome of one fan-out.
///
/// Returned by [`NotificationChannel::deliver`](crate::NotificationChannel::deliver).
/// On the bus-driven path (`post`) the report is not returned to the poster;
/// a delivery with panicked handlers is logged at `debug` instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Handlers called.
    pub invoked: usize,
    /// Handlers that panicked (always 0 when isolation is off).
    pub panicked: usize,
}

impl Delivery {
    /// True if every invoked handler returned normally.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.panicked == 0
    }
}

/// Subscriber key → handler map.
pub(crate) struct HandlerSet<T, K> {
    handlers: HashMap<K, Handler<T>>,
}

impl<T, K: Hash + Eq> HandlerSet<T, K> {
    pub(crate) fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Inserts or replaces the handler for `key`; returns true if one was replaced.
    pub(crate) fn insert(&mut self, key: K, handler: Handler<T>) -> bool {
        self.handlers.insert(key, handler).is_some()
    }

    /// Removes the handler for `key`; returns true if it was present.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.handlers.remove(key).is_some()
    }

    /// Drops every handler; returns how many there were.
    pub(crate) fn clear(&mut self) -> usize {
        let n = self.handlers.len();
        self.handlers.clear();
        n
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Clones the current handlers so they can be called without the lock.
    pub(crate) fn snapshot(&self) -> Vec<Handler<T>> {
        self.handlers.values().cloned().collect()
    }
}

/// Invokes each handler once with `value`.
pub(crate) fn fan_out<T>(
    topic: &str,
    handlers: &[Handler<T>],
    value: &T,
    isolate: bool,
) -> Delivery {
    let mut delivery = Delivery::default();
    for handler in handlers {
        delivery.invoked += 1;
        if !isolate {
            handler(value);
            continue;
        }
        if let Err(panic_err) = panic::catch_unwind(AssertUnwindSafe(|| handler(value))) {
            delivery.panicked += 1;
            let info = {
                let any = &*panic_err;
                if let Some(msg) = any.downcast_ref::<&'static str>() {
                    (*msg).to_string()
                } else if let Some(msg) = any.downcast_ref::<String>() {
                    msg.clone()
                } else {
                    "unknown panic".to_string()
                }
            };
            error!(topic, panic = %info, "notification handler panicked");
        }
    }
    delivery
}
