//! Type-erased carrier for one posted value.
//!
//! A [`Payload`] is created per post, travels through the bus by reference and
//! is dropped as soon as dispatch returns. It remembers the producer's type
//! name so a receiver can report what it got when the downcast fails.

use std::any::{Any, type_name};
use std::fmt;

/// Type name reported for a payload that carries nothing.
pub const EMPTY_TYPE_NAME: &str = "<none>";

/// Opaque value posted through a [`Bus`](crate::Bus).
///
/// The bus never looks inside; receivers recover the value with
/// [`downcast_ref`](Self::downcast_ref).
pub struct Payload {
    value: Option<Box<dyn Any>>,
    type_name: &'static str,
}

impl Payload {
    /// Wraps a value.
    pub fn new<T: 'static>(value: T) -> Self {
        Self {
            value: Some(Box::new(value)),
            type_name: type_name::<T>(),
        }
    }

    /// A payload that carries no value.
    ///
    /// No channel accepts it; it always takes the mismatch path.
    pub fn empty() -> Self {
        Self {
            value: None,
            type_name: EMPTY_TYPE_NAME,
        }
    }

    /// Type name of the wrapped value, or [`EMPTY_TYPE_NAME`].
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Borrows the wrapped value if it is a `T`.
    #[inline]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.as_deref()?.downcast_ref::<T>()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("type_name", &self.type_name)
            .field("empty", &self.is_empty())
            .finish()
    }
}
