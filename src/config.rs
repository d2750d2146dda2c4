//! # Per-channel configuration.
//!
//! Provides [`Config`], the settings a [`NotificationChannel`](crate::NotificationChannel)
//! consults on its delivery path, and [`MismatchPolicy`], which decides what a
//! type mismatch does to the process.
//!
//! ## Defaults
//! - `on_mismatch`: [`MismatchPolicy::Panic`] in debug builds, [`MismatchPolicy::Log`] in release builds
//! - `isolate_handlers = true`: a panicking handler does not stop the fan-out

use tracing::warn;

use crate::error::DeliveryError;

/// What a channel does when a payload on its topic is not of its value type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MismatchPolicy {
    /// Halt with the expected and given type names.
    Panic,
    /// Log a warning and drop the payload. Nothing is delivered.
    Log,
}

impl MismatchPolicy {
    /// Applies the policy to a failed delivery.
    ///
    /// # Panics
    /// Panics with the error's display text under [`MismatchPolicy::Panic`].
    pub fn apply(self, err: &DeliveryError) {
        match self {
            MismatchPolicy::Panic => panic!("notichan: {err}"),
            MismatchPolicy::Log => {
                warn!(
                    topic = %err.topic(),
                    label = err.as_label(),
                    "dropped notification: {}",
                    err.as_message()
                );
            }
        }
    }
}

impl Default for MismatchPolicy {
    /// `Panic` when built with `debug_assertions`, `Log` otherwise.
    fn default() -> Self {
        if cfg!(debug_assertions) {
            MismatchPolicy::Panic
        } else {
            MismatchPolicy::Log
        }
    }
}

/// Delivery settings for a single channel.
///
/// All fields are public; the `with_*` helpers are shorthands for building a
/// config inline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Reaction to a payload that cannot be unwrapped as the channel's type.
    pub on_mismatch: MismatchPolicy,

    /// Catch panics per handler during fan-out.
    ///
    /// - `true`: the panic is logged and counted, remaining handlers still run
    /// - `false`: the panic unwinds out of `post` and later handlers are skipped
    pub isolate_handlers: bool,
}

impl Config {
    /// Returns the config with the given mismatch policy.
    #[must_use]
    pub fn with_mismatch_policy(mut self, policy: MismatchPolicy) -> Self {
        self.on_mismatch = policy;
        self
    }

    /// Returns the config with handler isolation switched on or off.
    #[must_use]
    pub fn with_isolation(mut self, isolate: bool) -> Self {
        self.isolate_handlers = isolate;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            on_mismatch: MismatchPolicy::default(),
            isolate_handlers: true,
        }
    }
}
