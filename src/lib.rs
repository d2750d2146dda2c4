//! # notichan
//!
//! **notichan** provides typed, named notification channels over a synchronous
//! in-process bus.
//!
//! Components exchange values by topic name without holding references to each
//! other. Each [`NotificationChannel<T>`] only ever hands its handlers a `T`;
//! anything else arriving under its name is reported as a
//! [`DeliveryError::TypeMismatch`] and handled by the channel's
//! [`MismatchPolicy`].
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌────────────────────┐  ┌────────────────────┐  ┌────────────────────┐
//!     │ NotificationChannel│  │ NotificationChannel│  │ NotificationChannel│
//!     │  <u32> "volume"    │  │  <u32> "volume"    │  │  <Track> "track"   │
//!     │  handlers {k → h}  │  │  handlers {k → h}  │  │  handlers {}       │
//!     └───────┬──────▲─────┘  └───────┬──────▲─────┘  └───────┬────────────┘
//!        post │      │ receive   post │      │ receive   post │   (detached:
//!             ▼      │                ▼      │                ▼    no listener)
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │                 Bus (NotificationBus::global() by default)            │
//! │            topic → [(ListenerId, Listener)]   synchronous dispatch    │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! NotificationChannel::new(name)             Detached
//!   ├─► subscribe(k, h)  (first handler)   ─► attach listener ─► Attached
//!   ├─► subscribe(k, h') (same key)        ─► replace handler
//!   ├─► post(v)          ─► Payload ─► Bus ─► receive ─► downcast
//!   │                                          ├─ Ok  ─► every handler(&v)
//!   │                                          └─ Err ─► MismatchPolicy (panic | warn)
//!   ├─► unsubscribe(k)   (last handler)    ─► detach listener ─► Detached
//!   └─► unsubscribe_all() / drop           ─► detach listener ─► Detached
//! ```
//!
//! ## Features
//! | Area              | Description                                                    | Key types / traits                          |
//! |-------------------|----------------------------------------------------------------|---------------------------------------------|
//! | **Channels**      | Named, typed topics with keyed subscribers.                    | [`NotificationChannel`], [`ChannelState`]   |
//! | **Bus**           | Untyped synchronous dispatcher; injectable per channel.        | [`Bus`], [`Listener`], [`NotificationBus`]  |
//! | **Payloads**      | Type-erased carrier preserving the value's type across the bus.| [`Payload`]                                 |
//! | **Errors**        | Typed error for undeliverable payloads.                        | [`DeliveryError`]                           |
//! | **Configuration** | Mismatch policy and handler isolation.                         | [`Config`], [`MismatchPolicy`]              |
//! | **Testing**       | Channel contract as a trait for doubles.                       | [`Notify`]                                  |
//!
//! ## Logging
//! The crate emits [`tracing`] events (attach/detach at `debug`, dispatch at
//! `trace`, dropped payloads at `warn`, handler panics at `error`) and never
//! installs a subscriber itself.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use notichan::{Config, MismatchPolicy, NotificationBus, NotificationChannel};
//!
//! let bus = Arc::new(NotificationBus::new());
//! let cfg = Config::default().with_mismatch_policy(MismatchPolicy::Log);
//! let status: NotificationChannel<String> =
//!     NotificationChannel::with_config("status", bus.clone(), cfg);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! status.subscribe("panel", move |s: &String| sink.lock().unwrap().push(s.clone()));
//! assert!(status.is_subscribed());
//!
//! status.post("online".to_string());
//! assert_eq!(*seen.lock().unwrap(), vec!["online".to_string()]);
//!
//! // A producer of another type on the same name is dropped, not delivered.
//! let rogue: NotificationChannel<u8> = NotificationChannel::with_bus("status", bus.clone());
//! rogue.post(1);
//! assert_eq!(seen.lock().unwrap().len(), 1);
//!
//! status.unsubscribe("panel");
//! assert!(!status.is_subscribed());
//! assert!(bus.is_empty());
//! ```
mod bus;
mod channel;
mod config;
mod error;

// ---- Public re-exports ----

pub use bus::{Bus, EMPTY_TYPE_NAME, Listener, ListenerId, NotificationBus, Payload};
pub use channel::{ChannelState, Delivery, Handler, NotificationChannel, Notify};
pub use config::{Config, MismatchPolicy};
pub use error::DeliveryError;
