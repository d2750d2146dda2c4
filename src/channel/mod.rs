//! Typed channels on top of the untyped bus.
//!
//! ## Contents
//! - [`NotificationChannel`], [`ChannelState`] the named, typed topic and its lifecycle
//! - [`Handler`], [`Delivery`] handler type and fan-out report
//! - [`Notify`] the channel contract as a trait (for test doubles)
//!
//! ## Wiring
//! ```text
//! channel.post(v) ──► Payload::new(v) ──► Bus::post(name, &payload)
//!                                              │ (same thread)
//!                                              ▼
//!                                  channel listener .receive()
//!                                              │ downcast::<T>()
//!                              ┌───────────────┴────────────────┐
//!                              ▼ Ok                             ▼ Err(TypeMismatch)
//!                     fan_out(handlers, &v)              MismatchPolicy::apply
//! ```

mod handlers;
mod notify;
mod typed;

pub use handlers::{Delivery, Handler};
pub use notify::Notify;
pub use typed::{ChannelState, NotificationChannel};
