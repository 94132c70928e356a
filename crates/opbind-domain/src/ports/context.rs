//! Per-call context port
//!
//! What the hosting layer exposes to injection: whether the instance is a
//! process-wide singleton, the ambient resolution session, a way to open
//! a fresh session, and the inbound message's properties.

use std::fmt;
use std::sync::Arc;

use crate::ports::resolution::ResolutionSession;
use crate::value_objects::MessageProperties;

/// The instance context hosting the service that serves a call
pub trait InstanceContext: Send + Sync {
    /// Whether the hosted instance lives for the whole process
    fn is_singleton(&self) -> bool;

    /// Session already associated with this instance
    fn session(&self) -> Arc<dyn ResolutionSession>;

    /// Open a new session owned by the caller
    fn create_session(&self) -> Box<dyn ResolutionSession>;
}

/// Ambient state of one dispatched call
#[derive(Clone)]
pub struct OperationContext {
    /// Instance context serving the call
    pub instance: Arc<dyn InstanceContext>,
    /// Inbound message properties
    pub properties: MessageProperties,
    /// Operation name
    pub action: String,
    /// Channel session id, when the binding is sessionful
    pub session_id: Option<String>,
}

impl OperationContext {
    /// Create a context for a sessionless call
    pub fn new(
        instance: Arc<dyn InstanceContext>,
        action: impl Into<String>,
        properties: MessageProperties,
    ) -> Self {
        Self {
            instance,
            properties,
            action: action.into(),
            session_id: None,
        }
    }

    /// Attach the channel session id
    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

impl fmt::Debug for OperationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationContext")
            .field("action", &self.action)
            .field("session_id", &self.session_id)
            .field("singleton", &self.instance.is_singleton())
            .field("properties", &self.properties)
            .finish()
    }
}
