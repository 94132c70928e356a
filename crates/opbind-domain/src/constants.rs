//! Domain layer constants
//!
//! Well-known names shared by generated code, the dispatcher and the
//! hosting layer. Infrastructure-specific constants live in
//! `opbind_infrastructure::constants`.

// ============================================================================
// CANONICAL KEY CONSTANTS
// ============================================================================

/// Separator between path segments and between the declaring type and method
pub const KEY_PATH_SEPARATOR: &str = ".";

/// Separator between parameter entries in a canonical key
pub const KEY_PARAMETER_SEPARATOR: &str = ", ";

/// Direction prefix for output-only parameters
pub const KEY_OUT_PREFIX: &str = "out ";

/// Direction prefix for input/output parameters
pub const KEY_INOUT_PREFIX: &str = "inout ";

// ============================================================================
// MESSAGE PROPERTY CONSTANTS
// ============================================================================

/// Message property under which the transport attaches its [`TransportContext`]
///
/// [`TransportContext`]: crate::value_objects::TransportContext
pub const TRANSPORT_CONTEXT_PROPERTY: &str = "opbind.transport.context";

/// Message property carrying the partition key of queue-based transports
pub const PARTITION_KEY_PROPERTY: &str = "opbind.queue.partition_key";

// ============================================================================
// BINDING NAMES
// ============================================================================

/// Binding name reported when the whole transport context is missing
pub const BINDING_TRANSPORT_CONTEXT: &str = "transport context";

/// Binding name reported when the transport request is missing
pub const BINDING_TRANSPORT_REQUEST: &str = "transport request";

/// Binding name reported when the transport response is missing
pub const BINDING_TRANSPORT_RESPONSE: &str = "transport response";
