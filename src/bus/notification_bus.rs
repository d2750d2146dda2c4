//! # In-process notification bus.
//!
//! [`NotificationBus`] keeps a table `topic -> [(ListenerId, Listener)]` behind a
//! mutex and dispatches posts synchronously.
//!
//! ## Architecture
//! ```text
//! Channels (many):                          Listeners (one per attached channel):
//!   ch "volume" ──post──┐                 ┌──► ch "volume" #1 .receive()
//!   ch "volume" ──post──┼──► NotificationBus ┤
//!   ch "track"  ──post──┘   (topic table)   └──► ch "volume" #7 .receive()
//! ```
//!
//! ## Rules
//! - **Snapshot dispatch**: `post` clones the listener `Arc`s under the lock,
//!   releases it, then calls each listener. Listeners may attach, detach or
//!   post re-entrantly.
//! - **No persistence**: a post under a topic nobody listens to is dropped.
//! - **Process-wide default**: [`NotificationBus::global`] returns the shared
//!   instance channels use unless another bus is injected.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::{debug, trace};

use super::{Bus, Listener, ListenerId, Payload};

static GLOBAL: OnceLock<Arc<NotificationBus>> = OnceLock::new();

/// One listener attached under a topic.
struct Registration {
    id: ListenerId,
    listener: Arc<dyn Listener>,
}

/// Synchronous topic-keyed dispatcher.
#[derive(Default)]
pub struct NotificationBus {
    topics: Mutex<HashMap<Arc<str>, Vec<Registration>>>,
}

impl NotificationBus {
    /// Creates an empty, isolated bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide bus.
    pub fn global() -> Arc<NotificationBus> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(NotificationBus::new())))
    }

    /// Number of listeners attached under `topic`.
    pub fn listener_count(&self, topic: &str) -> usize {
        self.table().get(topic).map_or(0, Vec::len)
    }

    /// Returns sorted list of topics with at least one listener.
    pub fn topics(&self) -> Vec<String> {
        let mut names: Vec<String> = self.table().keys().map(|t| t.to_string()).collect();
        names.sort_unstable();
        names
    }

    /// True if no listener is attached to any topic.
    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<Arc<str>, Vec<Registration>>> {
        // Every mutation below leaves the table consistent, so a poisoned lock is still usable.
        self.topics.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Bus for NotificationBus {
    fn attach(&self, id: ListenerId, topic: &str, listener: Arc<dyn Listener>) {
        let mut table = self.table();
        let regs = table.entry(Arc::from(topic)).or_default();
        match regs.iter_mut().find(|r| r.id == id) {
            Some(existing) => existing.listener = listener,
            None => regs.push(Registration { id, listener }),
        }
        debug!(topic, listener = %id, listeners = regs.len(), "listener attached");
    }

    fn detach(&self, id: ListenerId) {
        let mut table = self.table();
        let mut removed = 0usize;
        table.retain(|_, regs| {
            let before = regs.len();
            regs.retain(|r| r.id != id);
            removed += before - regs.len();
            !regs.is_empty()
        });
        if removed > 0 {
            debug!(listener = %id, removed, "listener detached");
        }
    }

    fn post(&self, topic: &str, payload: &Payload) -> usize {
        let targets: Vec<Arc<dyn Listener>> = match self.table().get(topic) {
            Some(regs) => regs.iter().map(|r| Arc::clone(&r.listener)).collect(),
            None => Vec::new(),
        };
        trace!(
            topic,
            payload_type = payload.type_name(),
            listeners = targets.len(),
            "dispatching notification"
        );
        for listener in &targets {
            listener.receive(topic, payload);
        }
        targets.len()
    }
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBus")
            .field("topics", &self.topics())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter {
        seen: AtomicUsize,
    }

    impl Listener for Counter {
        fn receive(&self, _topic: &str, _payload: &Payload) {
            self.seen.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn post_reaches_only_listeners_of_the_topic() {
        let bus = NotificationBus::new();
        let a = Arc::new(Counter::default());
        let b = Arc::new(Counter::default());
        bus.attach(ListenerId::next(), "a", a.clone());
        bus.attach(ListenerId::next(), "b", b.clone());

        assert_eq!(bus.post("a", &Payload::new(1u8)), 1);
        assert_eq!(a.seen.load(Ordering::SeqCst), 1);
        assert_eq!(b.seen.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn post_to_unknown_topic_reaches_nobody() {
        let bus = NotificationBus::new();
        assert_eq!(bus.post("nobody-home", &Payload::empty()), 0);
        assert!(bus.is_empty());
    }

    #[test]
    fn reattach_same_id_replaces() {
        let bus = NotificationBus::new();
        let id = ListenerId::next();
        let first = Arc::new(Counter::default());
        let second = Arc::new(Counter::default());
        bus.attach(id, "t", first.clone());
        bus.attach(id, "t", second.clone());

        assert_eq!(bus.listener_count("t"), 1);
        bus.post("t", &Payload::new(()));
        assert_eq!(first.seen.load(Ordering::SeqCst), 0);
        assert_eq!(second.seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn detach_removes_every_registration_of_the_id() {
        let bus = NotificationBus::new();
        let id = ListenerId::next();
        let other = ListenerId::next();
        let l = Arc::new(Counter::default());
        bus.attach(id, "x", l.clone());
        bus.attach(id, "y", l.clone());
        bus.attach(other, "y", l.clone());
        assert_eq!(bus.topics(), vec!["x".to_string(), "y".to_string()]);

        bus.detach(id);
        assert_eq!(bus.topics(), vec!["y".to_string()]);
        assert_eq!(bus.listener_count("y"), 1);

        bus.detach(other);
        bus.detach(other);
        assert!(bus.is_empty());
    }

    struct Detacher {
        bus: Arc<NotificationBus>,
        id: ListenerId,
    }

    impl Listener for Detacher {
        fn receive(&self, _topic: &str, _payload: &Payload) {
            self.bus.detach(self.id);
        }
    }

    #[test]
    fn listener_may_detach_itself_during_dispatch() {
        let bus = Arc::new(NotificationBus::new());
        let id = ListenerId::next();
        bus.attach(
            id,
            "once",
            Arc::new(Detacher {
                bus: bus.clone(),
                id,
            }),
        );

        assert_eq!(bus.post("once", &Payload::new(0u32)), 1);
        assert_eq!(bus.post("once", &Payload::new(0u32)), 0);
    }

    #[test]
    fn global_is_shared() {
        assert!(Arc::ptr_eq(&NotificationBus::global(), &NotificationBus::global()));
    }
}
