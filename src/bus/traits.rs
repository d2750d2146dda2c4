//! # Bus contract.
//!
//! [`Bus`] is the minimal surface a channel needs from the notification
//! dispatcher underneath it: attach a listener to a topic, detach it, and post
//! an opaque [`Payload`] to every listener of a topic.
//!
//! ## Rules
//! - **Synchronous**: `post` invokes listeners inline, on the caller's thread.
//! - **Name only**: topics are matched by string; the bus never inspects payloads.
//! - **Identity by id**: a listener is identified by its [`ListenerId`]; `detach`
//!   removes every registration held under that id.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use super::Payload;

/// Process-wide counter for listener ids.
static LISTENER_SEQ: AtomicU64 = AtomicU64::new(1);

/// Identity of one listener registered on a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Allocates a fresh, process-unique id.
    pub fn next() -> Self {
        Self(LISTENER_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Receiver side of the bus.
///
/// Called from inside [`Bus::post`], on the posting thread. Implementations
/// must not assume any bus lock is held and may call back into the bus.
pub trait Listener: Send + Sync + 'static {
    /// Handles one payload posted under `topic`.
    fn receive(&self, topic: &str, payload: &Payload);
}

/// Untyped, synchronous, in-process notification dispatcher.
///
/// [`NotificationBus`](crate::NotificationBus) is the stock implementation;
/// tests and hosts may supply their own.
pub trait Bus: Send + Sync + 'static {
    /// Registers `listener` under `topic`.
    ///
    /// Attaching the same id to the same topic again replaces the listener.
    fn attach(&self, id: ListenerId, topic: &str, listener: Arc<dyn Listener>);

    /// Removes every registration held by `id`. Unknown ids are ignored.
    fn detach(&self, id: ListenerId);

    /// Delivers `payload` to every listener currently attached under `topic`.
    ///
    /// Returns the number of listeners reached.
    fn post(&self, topic: &str, payload: &Payload) -> usize;
}
