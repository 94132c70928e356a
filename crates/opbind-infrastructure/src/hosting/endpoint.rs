//! Service endpoints

use std::fmt;
use std::sync::Arc;

use opbind_domain::{Error, InstanceContextMode, OperationSignature, Result};

use crate::hosting::binding::Binding;
use crate::hosting::instance::{Activator, HostedInstanceContext};

/// An opened endpoint: one contract served at one address
pub struct Endpoint {
    pub(crate) address: String,
    pub(crate) contract: &'static str,
    pub(crate) operations: &'static [&'static OperationSignature],
    pub(crate) declared: InstanceContextMode,
    pub(crate) mode: InstanceContextMode,
    pub(crate) binding: Binding,
    pub(crate) activator: Activator,
    pub(crate) single: Option<Arc<HostedInstanceContext>>,
}

impl Endpoint {
    /// Endpoint address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Name of the served contract
    pub fn contract(&self) -> &'static str {
        self.contract
    }

    /// Mode requested when the endpoint was added
    pub fn declared_mode(&self) -> InstanceContextMode {
        self.declared
    }

    /// Mode instances are actually hosted with
    pub fn mode(&self) -> InstanceContextMode {
        self.mode
    }

    /// Endpoint binding
    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Operation signatures of the contract
    pub fn operations(&self) -> &'static [&'static OperationSignature] {
        self.operations
    }

    /// Signature of the operation named by `action`
    pub fn operation(&self, action: &str) -> Result<&'static OperationSignature> {
        self.operations
            .iter()
            .copied()
            .find(|op| op.method == action)
            .ok_or_else(|| Error::UnknownOperation {
                contract: self.contract,
                action: action.to_string(),
            })
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("address", &self.address)
            .field("contract", &self.contract)
            .field("mode", &self.mode)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}
