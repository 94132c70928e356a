//! Instance contexts
//!
//! An instance context owns one service instance together with the
//! resolution session it was created from.

use std::fmt;
use std::sync::Arc;

use opbind_domain::{
    InstanceContext, InstanceContextMode, ResolutionSession, Result, ServiceInstance,
};
use tracing::debug;

use crate::di::ServiceProvider;

/// Builds a contract instance from a resolution session
pub type Activator = Arc<dyn Fn(&dyn ResolutionSession) -> Result<ServiceInstance> + Send + Sync>;

/// Instance context of a hosted endpoint
///
/// `Single` contexts resolve from the root provider and report
/// `is_singleton`; other modes own a fresh scope that is released with
/// the context.
pub struct HostedInstanceContext {
    mode: InstanceContextMode,
    provider: ServiceProvider,
    session: Arc<dyn ResolutionSession>,
    instance: ServiceInstance,
}

impl HostedInstanceContext {
    /// Open a context for `mode` and activate its instance
    pub fn open(
        mode: InstanceContextMode,
        provider: &ServiceProvider,
        activator: &Activator,
    ) -> Result<Self> {
        let session: Arc<dyn ResolutionSession> = if mode.is_singleton() {
            Arc::new(provider.clone())
        } else {
            Arc::new(provider.create_scope())
        };
        let instance = activator(session.as_ref())?;
        debug!(%mode, contract = instance.contract_name(), "Instance context opened");
        Ok(Self {
            mode,
            provider: provider.clone(),
            session,
            instance,
        })
    }

    /// Mode the context was opened with
    pub fn mode(&self) -> InstanceContextMode {
        self.mode
    }

    /// The hosted instance
    pub fn instance(&self) -> &ServiceInstance {
        &self.instance
    }
}

impl InstanceContext for HostedInstanceContext {
    fn is_singleton(&self) -> bool {
        self.mode.is_singleton()
    }

    fn session(&self) -> Arc<dyn ResolutionSession> {
        Arc::clone(&self.session)
    }

    fn create_session(&self) -> Box<dyn ResolutionSession> {
        Box::new(self.provider.create_scope())
    }
}

impl Drop for HostedInstanceContext {
    fn drop(&mut self) {
        debug!(mode = %self.mode, contract = self.instance.contract_name(), "Instance context released");
    }
}

impl fmt::Debug for HostedInstanceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostedInstanceContext")
            .field("mode", &self.mode)
            .field("instance", &self.instance)
            .finish_non_exhaustive()
    }
}
