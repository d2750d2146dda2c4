//! Error types raised on the delivery path.
//!
//! [`DeliveryError`] is returned by
//! [`NotificationChannel::deliver`](crate::NotificationChannel::deliver) when a
//! payload received under the channel's topic cannot be unwrapped as the
//! channel's value type. What happens next (halt or log) is decided by
//! [`MismatchPolicy`](crate::MismatchPolicy).
//!
//! Like the rest of the crate, the enum provides `as_label` / `as_message`
//! helpers for logs and metrics.

use std::sync::Arc;

use thiserror::Error;

/// # Errors produced while delivering a payload to a channel.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The payload is not a wrapped value of the channel's type.
    ///
    /// Happens when two channels of different value types share a topic name,
    /// or when something posted an empty payload under the topic.
    #[error("type mismatch on topic '{topic}': expected {expected}, given {actual}")]
    TypeMismatch {
        /// Topic the payload arrived on.
        topic: Arc<str>,
        /// Type the receiving channel expects.
        expected: &'static str,
        /// Type the payload actually carries (`"<none>"` for an empty payload).
        actual: &'static str,
    },
}

impl DeliveryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use notichan::DeliveryError;
    ///
    /// let err = DeliveryError::TypeMismatch {
    ///     topic: "ticks".into(),
    ///     expected: "u64",
    ///     actual: "alloc::string::String",
    /// };
    /// assert_eq!(err.as_label(), "delivery_type_mismatch");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DeliveryError::TypeMismatch { .. } => "delivery_type_mismatch",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DeliveryError::TypeMismatch {
                topic,
                expected,
                actual,
            } => format!("topic={topic} expected type: {expected} given type: {actual}"),
        }
    }

    /// Topic on which the failed delivery happened.
    pub fn topic(&self) -> &str {
        match self {
            DeliveryError::TypeMismatch { topic, .. } => topic,
        }
    }
}
