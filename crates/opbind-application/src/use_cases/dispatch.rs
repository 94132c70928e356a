//! Operation dispatch
//!
//! Resolves the adapter for a call, fills its input buffer from decoded
//! wire arguments and invokes it with the call's operation context
//! installed.

use std::sync::Arc;

use opbind_domain::{
    Error, InvocationOutcome, OperationContext, OperationSignature, Result, ServiceInstance, Value,
    canonicalize,
};
use tracing::{Instrument, debug, debug_span};

use crate::domain_services::context;
use crate::domain_services::registry::InvocationRegistry;

/// Dispatches calls through the invocation registry
#[derive(Debug, Clone)]
pub struct OperationDispatcher {
    registry: Arc<InvocationRegistry>,
}

impl OperationDispatcher {
    /// Create a dispatcher over `registry`
    pub fn new(registry: Arc<InvocationRegistry>) -> Self {
        Self { registry }
    }

    /// Create a dispatcher over the process-wide registry
    pub fn global() -> Result<Self> {
        InvocationRegistry::global().map(Self::new)
    }

    /// Registry used by this dispatcher
    pub fn registry(&self) -> &Arc<InvocationRegistry> {
        &self.registry
    }

    /// Dispatch a call to the operation described by `signature`
    pub async fn dispatch_signature(
        &self,
        signature: &OperationSignature,
        instance: &ServiceInstance,
        arguments: Vec<Value>,
        context: OperationContext,
    ) -> Result<InvocationOutcome> {
        let key = canonicalize(signature);
        self.dispatch(key.as_str(), instance, arguments, context).await
    }

    /// Dispatch a call to the operation registered under `key`
    ///
    /// `arguments` are the decoded wire values, one per input slot.
    pub async fn dispatch(
        &self,
        key: &str,
        instance: &ServiceInstance,
        arguments: Vec<Value>,
        context: OperationContext,
    ) -> Result<InvocationOutcome> {
        let adapter = self.registry.lookup(key)?;
        let mut inputs = adapter.allocate_inputs();
        if arguments.len() != inputs.len() {
            return Err(Error::ArgumentCount {
                operation: key.to_string(),
                expected: inputs.len(),
                actual: arguments.len(),
            });
        }
        inputs.fill(arguments)?;

        let span = debug_span!("dispatch", key, action = %context.action);
        async move {
            debug!("Invoking operation");
            let outcome = context::scope(Arc::new(context), adapter.invoke(instance, inputs)).await;
            if let Err(e) = &outcome {
                debug!(error = %e, "Operation returned an error");
            }
            outcome
        }
        .instrument(span)
        .await
    }
}
