//! Injection runtime
//!
//! Delegation wrappers open an [`InjectionScope`] at call entry and resolve
//! every injected parameter through it before calling the implementation.
//!
//! Session selection:
//!
//! | Hosting instance | Session used |
//! |------------------|--------------|
//! | process-wide singleton | a fresh session owned by the scope, opened on first resolve and released when the scope drops |
//! | per-call / per-session | the ambient session of the instance context |

use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock};

use opbind_domain::constants::{
    BINDING_TRANSPORT_CONTEXT, BINDING_TRANSPORT_REQUEST, BINDING_TRANSPORT_RESPONSE,
};
use opbind_domain::{
    Error, OperationContext, ResolutionSession, ResolutionSessionExt, Result, TransportContext,
    TransportRequest, TransportResponse,
};
use tracing::{debug, trace};

use crate::domain_services::context;

enum Session {
    Ambient(Arc<dyn ResolutionSession>),
    Isolated(OnceLock<Box<dyn ResolutionSession>>),
}

/// Resolution state of one call into a delegation wrapper
pub struct InjectionScope {
    context: Arc<OperationContext>,
    session: Session,
}

impl InjectionScope {
    /// Open a scope for the call being served
    pub fn current() -> Result<Self> {
        context::current()
            .map(Self::enter)
            .ok_or(Error::NoOperationContext)
    }

    /// Open a scope for `context`
    ///
    /// On a singleton instance the isolated session is not opened until the
    /// first resolve, so transport and property reads never create one.
    pub fn enter(context: Arc<OperationContext>) -> Self {
        let session = if context.instance.is_singleton() {
            Session::Isolated(OnceLock::new())
        } else {
            Session::Ambient(context.instance.session())
        };
        Self { context, session }
    }

    /// Whether the scope owns a session opened for this call only
    pub fn is_isolated(&self) -> bool {
        matches!(self.session, Session::Isolated(_))
    }

    /// Whether a session is available without opening one
    pub fn has_session(&self) -> bool {
        match &self.session {
            Session::Ambient(_) => true,
            Session::Isolated(cell) => cell.get().is_some(),
        }
    }

    /// Operation context the scope was opened for
    pub fn context(&self) -> &OperationContext {
        &self.context
    }

    fn session(&self) -> &dyn ResolutionSession {
        match &self.session {
            Session::Ambient(session) => session.as_ref(),
            Session::Isolated(cell) => cell
                .get_or_init(|| {
                    debug!(action = %self.context.action, "Opening isolated resolution session");
                    self.context.instance.create_session()
                })
                .as_ref(),
        }
    }

    fn transport(&self, binding: &'static str) -> Result<&TransportContext> {
        self.context
            .properties
            .transport_context()
            .ok_or(Error::MissingTransportContext { binding })
    }

    /// Transport context of the inbound message
    pub fn transport_context(&self) -> Result<TransportContext> {
        self.transport(BINDING_TRANSPORT_CONTEXT).cloned()
    }

    /// Transport request of the inbound message
    pub fn transport_request(&self) -> Result<TransportRequest> {
        self.transport(BINDING_TRANSPORT_REQUEST)
            .map(|t| t.request.clone())
    }

    /// Transport response handle of the inbound message
    pub fn transport_response(&self) -> Result<TransportResponse> {
        self.transport(BINDING_TRANSPORT_RESPONSE)
            .map(|t| t.response.clone())
    }

    /// Named message property, `None` when absent or of another type
    pub fn message_property<T: Any + Clone>(&self, name: &str) -> Option<T> {
        self.context.properties.get::<T>(name).cloned()
    }

    /// Resolve `T` from the active session
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.session().resolve::<T>()
    }

    /// Resolve `T` under `key` from the active session
    pub fn resolve_keyed<T: ?Sized + Send + Sync + 'static>(&self, key: &str) -> Result<Arc<T>> {
        self.session().resolve_keyed::<T>(key)
    }

    /// Resolve `T` from the active session, `None` when not registered
    pub fn try_resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Option<Arc<T>>> {
        self.session().try_resolve::<T>()
    }

    /// Resolve `T` under `key` from the active session, `None` when not registered
    pub fn try_resolve_keyed<T: ?Sized + Send + Sync + 'static>(
        &self,
        key: &str,
    ) -> Result<Option<Arc<T>>> {
        self.session().try_resolve_keyed::<T>(key)
    }
}

impl Drop for InjectionScope {
    fn drop(&mut self) {
        if let Session::Isolated(cell) = &self.session
            && cell.get().is_some()
        {
            trace!(action = %self.context.action, "Releasing isolated resolution session");
        }
    }
}

impl fmt::Debug for InjectionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectionScope")
            .field("action", &self.context.action)
            .field("isolated", &self.is_isolated())
            .field("has_session", &self.has_session())
            .finish()
    }
}
