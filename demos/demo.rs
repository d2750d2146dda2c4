//! A media player broadcasting state to decoupled widgets.
//!
//! Run with `RUST_LOG=notichan=trace cargo run --example demo` to see the
//! attach/detach and dispatch events.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use notichan::{Config, MismatchPolicy, NotificationChannel};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Track {
    title: String,
    artist: String,
}

/// Widget that only knows topic names, never the player.
struct NowPlaying {
    tracks: NotificationChannel<Track>,
    volume: NotificationChannel<u32>,
}

impl NowPlaying {
    fn attach() -> Self {
        let widget = Self {
            tracks: NotificationChannel::new("player.track"),
            volume: NotificationChannel::new("player.volume"),
        };
        widget.tracks.subscribe("now-playing", |t: &Track| {
            println!("[now-playing] {} - {}", t.artist, t.title);
        });
        widget.volume.subscribe("now-playing", |v: &u32| {
            println!("[now-playing] volume {v}%");
        });
        widget
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let tracks: NotificationChannel<Track> = NotificationChannel::new("player.track");
    let volume: NotificationChannel<u32> = NotificationChannel::with_config(
        "player.volume",
        notichan::NotificationBus::global(),
        Config::default().with_mismatch_policy(MismatchPolicy::Log),
    );

    let peak = Arc::new(AtomicU32::new(0));
    let meter = Arc::clone(&peak);
    volume.subscribe("peak-meter", move |v: &u32| {
        meter.fetch_max(*v, Ordering::Relaxed);
    });

    {
        let _widget = NowPlaying::attach();
        tracks.post(Track {
            title: "Teardrop".into(),
            artist: "Massive Attack".into(),
        });
        volume.post(40);
        volume.post(65);
    }
    println!("widget closed; its channels detached");

    volume.post(30);
    println!("peak volume seen: {}%", peak.load(Ordering::Relaxed));

    // Nobody listens to tracks any more; the post reaches no listener.
    let reached = tracks.post(Track {
        title: "Angel".into(),
        artist: "Massive Attack".into(),
    });
    println!("track listeners reached after close: {reached}");
}
