//! Shared helpers

use std::sync::Arc;

use opbind::{
    Channel, InvocationAdapter, InvocationRegistry, OperationSignature, ServiceContract,
    canonicalize,
};

/// Adapter registered for operation `method` of contract `C`
pub fn adapter_for<C: ?Sized + ServiceContract>(method: &str) -> Arc<dyn InvocationAdapter> {
    let signature = signature_of::<C>(method);
    InvocationRegistry::global()
        .expect("global registry")
        .lookup(canonicalize(signature).as_str())
        .expect("adapter registered")
}

/// Signature of operation `method` of contract `C`
pub fn signature_of<C: ?Sized + ServiceContract>(method: &str) -> &'static OperationSignature {
    C::operation(method).expect("operation declared")
}

/// Call an operation without arguments and take its return value
pub async fn call_for<T: std::any::Any>(channel: &Channel, action: &str) -> T {
    channel
        .call(opbind::Message::new(action))
        .await
        .expect("call succeeds")
        .into_return::<T>()
        .expect("return value of the expected type")
}
