//! Call-local buffers exchanged with invocation adapters

use std::any::{Any, type_name};
use std::fmt;

use crate::error::{Error, Result};

/// Type-erased argument, output or return value
pub type Value = Box<dyn Any + Send>;

/// Ordered input slots for one call, one per `In`/`InOut` parameter
#[derive(Default)]
pub struct InputBuffer {
    slots: Vec<Option<Value>>,
}

impl InputBuffer {
    /// Buffer without slots; does not allocate
    pub const fn empty() -> Self {
        Self { slots: Vec::new() }
    }

    /// Buffer with `len` empty slots
    pub fn with_len(len: usize) -> Self {
        if len == 0 {
            return Self::empty();
        }
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || None);
        Self { slots }
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the buffer has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Allocated capacity, zero for [`InputBuffer::empty`]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Fill slot `position`
    pub fn set(&mut self, position: usize, value: Value) -> Result<()> {
        let len = self.slots.len();
        let slot = self.slots.get_mut(position).ok_or_else(|| {
            Error::internal(format!(
                "input slot {position} out of range for buffer of {len}"
            ))
        })?;
        *slot = Some(value);
        Ok(())
    }

    /// Fill slots in order from decoded wire arguments
    pub fn fill(&mut self, arguments: Vec<Value>) -> Result<()> {
        for (position, value) in arguments.into_iter().enumerate() {
            self.set(position, value)?;
        }
        Ok(())
    }

    /// Whether slot `position` has been filled
    pub fn is_set(&self, position: usize) -> bool {
        self.slots.get(position).is_some_and(Option::is_some)
    }

    /// Take the value of slot `position` as a `T`
    pub fn take<T: Any>(&mut self, position: usize) -> Result<T> {
        let value = self
            .slots
            .get_mut(position)
            .and_then(Option::take)
            .ok_or(Error::MissingInput { position })?;
        value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| Error::InputTypeMismatch {
                position,
                expected: type_name::<T>(),
            })
    }
}

impl fmt::Debug for InputBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filled: Vec<bool> = self.slots.iter().map(Option::is_some).collect();
        f.debug_struct("InputBuffer").field("filled", &filled).finish()
    }
}

/// Result of one adapter invocation
#[derive(Default)]
pub struct InvocationOutcome {
    /// Return value; `None` for void shapes
    pub return_value: Option<Value>,
    /// Output values, one per `Out`/`InOut` parameter in declared order
    pub outputs: Vec<Value>,
}

impl InvocationOutcome {
    /// Create an outcome
    pub fn new(return_value: Option<Value>, outputs: Vec<Value>) -> Self {
        Self {
            return_value,
            outputs,
        }
    }

    /// Downcast the return value
    pub fn return_as<T: Any>(&self) -> Option<&T> {
        self.return_value.as_ref().and_then(|v| v.downcast_ref::<T>())
    }

    /// Downcast output `index`
    pub fn output_as<T: Any>(&self, index: usize) -> Option<&T> {
        self.outputs.get(index).and_then(|v| v.downcast_ref::<T>())
    }

    /// Take the return value as a `T`
    pub fn into_return<T: Any>(self) -> Option<T> {
        self.return_value
            .and_then(|v| v.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }
}

impl fmt::Debug for InvocationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationOutcome")
            .field("has_return", &self.return_value.is_some())
            .field("outputs", &self.outputs.len())
            .finish()
    }
}
