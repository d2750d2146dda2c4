//! Posting and (un)subscribing from many threads at once.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use notichan::{
    Bus, ChannelState, Listener, ListenerId, NotificationBus, NotificationChannel, Payload,
};

/// Forwards to a real bus and counts attach/detach calls.
#[derive(Default)]
struct CountingBus {
    inner: NotificationBus,
    attaches: AtomicUsize,
    detaches: AtomicUsize,
}

impl CountingBus {
    fn counts(&self) -> (usize, usize) {
        (
            self.attaches.load(Ordering::SeqCst),
            self.detaches.load(Ordering::SeqCst),
        )
    }
}

impl Bus for CountingBus {
    fn attach(&self, id: ListenerId, topic: &str, listener: Arc<dyn Listener>) {
        self.attaches.fetch_add(1, Ordering::SeqCst);
        self.inner.attach(id, topic, listener);
    }

    fn detach(&self, id: ListenerId) {
        self.detaches.fetch_add(1, Ordering::SeqCst);
        self.inner.detach(id);
    }

    fn post(&self, topic: &str, payload: &Payload) -> usize {
        self.inner.post(topic, payload)
    }
}

const POSTERS: u64 = 8;
const POSTS_EACH: u64 = 500;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn posts_race_with_subscription_churn() {
    let bus = Arc::new(NotificationBus::new());
    let ch: Arc<NotificationChannel<u64>> =
        Arc::new(NotificationChannel::with_bus("race", bus.clone()));

    let count = Arc::new(AtomicU64::new(0));
    let sum = Arc::new(AtomicU64::new(0));
    {
        let (count, sum) = (Arc::clone(&count), Arc::clone(&sum));
        ch.subscribe("stable", move |v: &u64| {
            count.fetch_add(1, Ordering::SeqCst);
            sum.fetch_add(*v, Ordering::SeqCst);
        });
    }

    let mut tasks = Vec::new();
    for p in 0..POSTERS {
        let ch = Arc::clone(&ch);
        tasks.push(tokio::spawn(async move {
            for i in 0..POSTS_EACH {
                ch.post(p * POSTS_EACH + i);
                tokio::task::yield_now().await;
            }
        }));
    }
    for c in 0..4 {
        let ch = Arc::clone(&ch);
        tasks.push(tokio::spawn(async move {
            for i in 0..200 {
                let key = format!("churn-{c}-{i}");
                ch.subscribe(key.clone(), |_: &u64| {});
                tokio::task::yield_now().await;
                ch.unsubscribe(key.as_str());
            }
        }));
    }
    for t in tasks {
        t.await.expect("task panicked");
    }

    let total = POSTERS * POSTS_EACH;
    assert_eq!(count.load(Ordering::SeqCst), total);
    assert_eq!(sum.load(Ordering::SeqCst), total * (total - 1) / 2);
    assert_eq!(ch.subscriber_count(), 1);
    assert_eq!(ch.state(), ChannelState::Attached);
    assert_eq!(bus.listener_count("race"), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_first_subscribers_attach_once() {
    let bus = Arc::new(CountingBus::default());
    let ch: Arc<NotificationChannel<u64, usize>> =
        Arc::new(NotificationChannel::with_bus("first", bus.clone()));

    let tasks: Vec<_> = (0..16usize)
        .map(|k| {
            let ch = Arc::clone(&ch);
            tokio::spawn(async move { ch.subscribe(k, |_: &u64| {}) })
        })
        .collect();
    for t in tasks {
        t.await.expect("task panicked");
    }

    assert_eq!(ch.subscriber_count(), 16);
    assert_eq!(bus.counts(), (1, 0));
    assert_eq!(bus.inner.listener_count("first"), 1);

    let tasks: Vec<_> = (0..16usize)
        .map(|k| {
            let ch = Arc::clone(&ch);
            tokio::spawn(async move { ch.unsubscribe(&k) })
        })
        .collect();
    for t in tasks {
        t.await.expect("task panicked");
    }

    assert!(!ch.is_subscribed());
    assert_eq!(bus.counts(), (1, 1));
    assert!(bus.inner.is_empty());
}
