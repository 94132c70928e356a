//! Inbound message model
//!
//! What the dispatcher hands to the core: an action naming the operation,
//! positional wire arguments already decoded by the transport, and a
//! string-keyed property bag with heterogeneous values.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::constants::TRANSPORT_CONTEXT_PROPERTY;
use crate::value_objects::invocation::Value;

/// String-keyed bag of heterogeneous values attached to a message
#[derive(Clone, Default)]
pub struct MessageProperties {
    entries: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl MessageProperties {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry
    pub fn insert<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.entries.insert(name.into(), Arc::new(value));
    }

    /// Get an entry when present and of type `T`
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.entries.get(name).and_then(|v| v.downcast_ref::<T>())
    }

    /// Whether an entry of any type exists under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Remove an entry
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Transport context attached by the transport, if any
    pub fn transport_context(&self) -> Option<&TransportContext> {
        self.get::<TransportContext>(TRANSPORT_CONTEXT_PROPERTY)
    }
}

impl fmt::Debug for MessageProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("MessageProperties")
            .field("names", &names)
            .finish()
    }
}

/// One inbound call as seen by the dispatcher
pub struct Message {
    /// Operation name within the endpoint's contract
    pub action: String,
    /// Wire arguments in input-slot order
    pub arguments: Vec<Value>,
    /// Property bag
    pub properties: MessageProperties,
}

impl Message {
    /// Create a message for `action` without arguments
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            arguments: Vec::new(),
            properties: MessageProperties::new(),
        }
    }

    /// Append a wire argument
    #[must_use]
    pub fn with_argument<T: Any + Send>(mut self, value: T) -> Self {
        self.arguments.push(Box::new(value));
        self
    }

    /// Attach a named property
    #[must_use]
    pub fn with_property<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.properties.insert(name, value);
        self
    }

    /// Attach a transport context under its well-known property name
    #[must_use]
    pub fn with_transport(self, context: TransportContext) -> Self {
        self.with_property(TRANSPORT_CONTEXT_PROPERTY, context)
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("action", &self.action)
            .field("arguments", &self.arguments.len())
            .field("properties", &self.properties)
            .finish()
    }
}

/// Transport-level request metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportRequest {
    /// Request method (e.g. `POST`)
    pub method: String,
    /// Request path
    pub path: String,
    /// Request headers
    pub headers: HashMap<String, String>,
}

impl TransportRequest {
    /// Create a request
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: HashMap::new(),
        }
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Look up a header
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

#[derive(Debug, Default)]
struct ResponseState {
    status: u16,
    headers: HashMap<String, String>,
}

/// Shared handle to the transport-level response
///
/// Clones refer to the same response; writes made by an operation are
/// visible to the transport after the call.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    state: Arc<Mutex<ResponseState>>,
}

impl Default for TransportResponse {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(ResponseState {
                status: 200,
                headers: HashMap::new(),
            })),
        }
    }
}

impl TransportResponse {
    /// Create a response with status 200
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ResponseState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current status code
    pub fn status(&self) -> u16 {
        self.lock().status
    }

    /// Set the status code
    pub fn set_status(&self, status: u16) {
        self.lock().status = status;
    }

    /// Set a header
    pub fn set_header(&self, name: impl Into<String>, value: impl Into<String>) {
        self.lock().headers.insert(name.into(), value.into());
    }

    /// Read a header
    pub fn header(&self, name: &str) -> Option<String> {
        self.lock().headers.get(name).cloned()
    }
}

/// Ambient transport state of one inbound message
#[derive(Debug, Clone, Default)]
pub struct TransportContext {
    /// Inbound request
    pub request: TransportRequest,
    /// Outbound response handle
    pub response: TransportResponse,
}

impl TransportContext {
    /// Create a context for a request with a fresh response
    pub fn new(request: TransportRequest) -> Self {
        Self {
            request,
            response: TransportResponse::new(),
        }
    }
}
