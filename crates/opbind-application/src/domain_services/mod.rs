//! Domain services
//!
//! - [`registry`]: the invocation registry
//! - [`context`]: the task-local operation context
//! - [`injection`]: the injection runtime used by delegation wrappers

pub mod context;
pub mod injection;
pub mod registry;

pub use injection::InjectionScope;
pub use registry::{InvocationRegistry, RegistrationOutcome};
