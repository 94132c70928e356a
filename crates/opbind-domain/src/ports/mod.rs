//! Domain Port Interfaces
//!
//! Contracts between generated code, the dispatcher and the hosting
//! environment.

/// Per-call context
pub mod context;
/// Invocation adapter contract
pub mod invocation;
/// Service resolution
pub mod resolution;

pub use context::{InstanceContext, OperationContext};
pub use invocation::{InvocationAdapter, ServiceContract, ServiceInstance};
pub use resolution::{
    AnyService, ResolutionSession, ResolutionSessionExt, ServiceKey, downcast_service,
    erase_service,
};
