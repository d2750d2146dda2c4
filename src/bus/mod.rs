//! Untyped notification bus: contract, stock implementation and payload.
//!
//! ## Contents
//! - [`Bus`], [`Listener`], [`ListenerId`] the dispatcher contract
//! - [`NotificationBus`] synchronous in-process implementation (with a process-wide instance)
//! - [`Payload`] type-erased carrier for one posted value
//!
//! Channels are the only publishers and listeners in this crate; see
//! `channel/mod.rs` for how they sit on top.

mod notification_bus;
mod payload;
mod traits;

pub use notification_bus::NotificationBus;
pub use payload::{EMPTY_TYPE_NAME, Payload};
pub use traits::{Bus, Listener, ListenerId};
