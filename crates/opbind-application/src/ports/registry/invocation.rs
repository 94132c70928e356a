//! Invocation Adapter Registry Slice

use std::fmt;
use std::sync::Arc;

use opbind_domain::{InvocationAdapter, OperationSignature, canonicalize};

/// Registry entry for one generated invocation adapter
///
/// The registry keys the entry by the canonical key of its signature.
pub struct InvocationAdapterEntry {
    /// Signature the adapter is bound to
    pub signature: &'static OperationSignature,
    /// Factory creating the adapter
    pub factory: fn() -> Arc<dyn InvocationAdapter>,
}

impl fmt::Debug for InvocationAdapterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationAdapterEntry")
            .field("declaring_type", &self.signature.declaring_type)
            .field("method", &self.signature.method)
            .finish_non_exhaustive()
    }
}

// Generated adapters submit entries at link time
#[linkme::distributed_slice]
pub static INVOCATION_ADAPTERS: [InvocationAdapterEntry] = [..];

/// List all linked adapters as `(key, declaring type)` pairs
pub fn list_invocation_adapters() -> Vec<(String, &'static str)> {
    INVOCATION_ADAPTERS
        .iter()
        .map(|e| (canonicalize(e.signature).to_string(), &*e.signature.declaring_type))
        .collect()
}
