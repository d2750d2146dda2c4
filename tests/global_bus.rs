//! Channels on the process-wide bus.
//!
//! Every test uses its own topic names: the global bus is shared by all tests
//! in this binary, which run in parallel.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use notichan::{
    ChannelState, Config, MismatchPolicy, NotificationBus, NotificationChannel, Payload,
};

#[test]
fn independent_components_talk_by_name() {
    // Producer and consumer never see each other, only the topic name.
    let consumer: NotificationChannel<(u32, String)> = NotificationChannel::new("gb.download");
    let progress = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&progress);
    consumer.subscribe("progress-bar", move |(pct, file): &(u32, String)| {
        sink.lock().unwrap().push(format!("{file}:{pct}"));
    });

    let producer: NotificationChannel<(u32, String)> = NotificationChannel::new("gb.download");
    assert!(!producer.is_subscribed());
    for pct in [10, 60, 100] {
        producer.post((pct, "iso".to_string()));
    }

    assert_eq!(
        *progress.lock().unwrap(),
        vec!["iso:10", "iso:60", "iso:100"]
    );
}

#[test]
fn drop_leaves_no_listener_on_the_global_bus() {
    let bus = NotificationBus::global();
    {
        let ch: NotificationChannel<u64> = NotificationChannel::new("gb.dropped");
        ch.subscribe("a", |_: &u64| {});
        ch.subscribe("b", |_: &u64| {});
        assert_eq!(ch.state(), ChannelState::Attached);
        assert_eq!(bus.listener_count("gb.dropped"), 1);
    }
    assert_eq!(bus.listener_count("gb.dropped"), 0);
    assert!(!bus.topics().contains(&"gb.dropped".to_string()));

    // A later channel of another type reuses the name; nothing stale answers.
    let reuse: NotificationChannel<Vec<u8>> = NotificationChannel::new("gb.dropped");
    assert_eq!(reuse.post(vec![1, 2, 3]), 0);
}

#[test]
fn mismatched_reuse_of_a_live_name_is_logged_not_delivered() {
    let bus = NotificationBus::global();
    let live: NotificationChannel<i64> = NotificationChannel::with_config(
        "gb.clash",
        bus.clone(),
        Config::default().with_mismatch_policy(MismatchPolicy::Log),
    );
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    live.subscribe("x", move |_: &i64| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let impostor: NotificationChannel<f64> = NotificationChannel::new("gb.clash");
    assert_eq!(impostor.post(1.5), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    live.post(3);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn empty_payload_takes_the_mismatch_path() {
    let ch: NotificationChannel<String> = NotificationChannel::new("gb.empty");
    let err = ch.deliver(&Payload::empty()).unwrap_err();
    assert_eq!(err.as_label(), "delivery_type_mismatch");
    assert_eq!(err.topic(), "gb.empty");
}

#[test]
fn state_follows_handler_count() {
    let ch: NotificationChannel<u8, u32> = NotificationChannel::new("gb.states");
    assert_eq!(ch.state(), ChannelState::Detached);

    ch.subscribe(1u32, |_: &u8| {});
    ch.subscribe(2u32, |_: &u8| {});
    assert_eq!(ch.state(), ChannelState::Attached);

    ch.unsubscribe(&1u32);
    assert_eq!(ch.state(), ChannelState::Attached);
    ch.post(0);
    assert_eq!(ch.subscriber_count(), 1);

    ch.unsubscribe(&2u32);
    assert_eq!(ch.state(), ChannelState::Detached);
    assert!(!ch.is_subscribed());
}
