//! Invocation adapter port
//!
//! The fixed calling convention the dispatcher uses for every operation,
//! whatever its parameter directions or return shape.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::ports::resolution::AnyService;
use crate::value_objects::{InputBuffer, InvocationOutcome, OperationSignature};

/// Uniform entry point for one contract operation
///
/// Stateless beyond its bound signature; one adapter serves concurrent
/// calls.
#[async_trait]
pub trait InvocationAdapter: Send + Sync {
    /// Signature this adapter is bound to
    fn signature(&self) -> &'static OperationSignature;

    /// Fresh input slots, one per `In`/`InOut` parameter
    fn allocate_inputs(&self) -> InputBuffer;

    /// Invoke the operation on `instance`
    ///
    /// Errors raised by the operation are returned unchanged.
    async fn invoke(&self, instance: &ServiceInstance, inputs: InputBuffer)
    -> Result<InvocationOutcome>;
}

/// A service instance as seen by adapters
///
/// Holds an `Arc<C>` for the contract type `C` (typically `dyn Contract`)
/// behind a type-erased handle.
#[derive(Clone)]
pub struct ServiceInstance {
    inner: AnyService,
    contract: &'static str,
}

impl ServiceInstance {
    /// Wrap a typed instance
    pub fn new<C: ?Sized + Send + Sync + 'static>(instance: Arc<C>) -> Self {
        Self {
            inner: Arc::new(instance),
            contract: type_name::<C>(),
        }
    }

    /// Wrap an already erased `Arc<Arc<C>>`
    pub fn from_erased(inner: AnyService, contract: &'static str) -> Self {
        Self { inner, contract }
    }

    /// Borrow the instance as contract `C`
    pub fn contract<C: ?Sized + 'static>(&self) -> Result<&Arc<C>> {
        (self.inner.as_ref() as &dyn Any)
            .downcast_ref::<Arc<C>>()
            .ok_or(Error::InstanceTypeMismatch {
                expected: type_name::<C>(),
            })
    }

    /// Type name of the wrapped contract
    pub fn contract_name(&self) -> &'static str {
        self.contract
    }
}

impl fmt::Debug for ServiceInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceInstance")
            .field("contract", &self.contract)
            .finish_non_exhaustive()
    }
}

/// A declared service contract
///
/// Implemented by the contract macro for `dyn Contract`.
pub trait ServiceContract: 'static {
    /// Declaring type name (`namespace::Trait`)
    const NAME: &'static str;

    /// Operation signatures in declaration order
    fn operations() -> &'static [&'static OperationSignature];

    /// Find an operation by method name
    fn operation(method: &str) -> Option<&'static OperationSignature> {
        Self::operations()
            .iter()
            .copied()
            .find(|op| op.method == method)
    }
}
