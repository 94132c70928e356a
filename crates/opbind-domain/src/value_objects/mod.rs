//! Domain Value Objects
//!
//! Immutable descriptions of operations and the call-local data that
//! flows through dispatch.
//!
//! ## Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`OperationSignature`] | Declared shape of one contract operation |
//! | [`CanonicalKey`] | Deterministic key of an operation signature |
//! | [`ResolutionPlan`] | Binding rule of one injected parameter |
//! | [`ServiceLifetime`] | Container registration lifetime |
//! | [`InstanceContextMode`] | Host instancing policy |
//! | [`Message`] | Inbound call with its property bag |
//! | [`InputBuffer`] | Input slots of one call |
//! | [`InvocationOutcome`] | Return value and outputs of one call |

/// Canonical operation key
pub mod canonical_key;
/// Call-local buffers
pub mod invocation;
/// Lifetimes and instancing modes
pub mod lifetime;
/// Inbound message model
pub mod message;
/// Injected parameter binding rules
pub mod resolution;
/// Operation signatures
pub mod signature;

pub use canonical_key::CanonicalKey;
pub use invocation::{InputBuffer, InvocationOutcome, Value};
pub use lifetime::{InstanceContextMode, ServiceLifetime};
pub use message::{Message, MessageProperties, TransportContext, TransportRequest, TransportResponse};
pub use resolution::ResolutionPlan;
pub use signature::{OperationSignature, ParameterDescriptor, ParameterDirection, ReturnShape};
