//! Client channels
//!
//! A channel is the caller side of one connection to an endpoint. On a
//! sessionful binding it carries a session id, and a `PerSession`
//! endpoint keeps one instance context for the channel's lifetime.

use std::fmt;
use std::sync::Arc;

use opbind_domain::{
    Error, InstanceContextMode, InvocationOutcome, Message, OperationContext, Result,
};
use tracing::debug;
use uuid::Uuid;

use crate::hosting::endpoint::Endpoint;
use crate::hosting::host::HostInner;
use crate::hosting::instance::HostedInstanceContext;

/// Caller side of a connection to one endpoint
pub struct Channel {
    host: Arc<HostInner>,
    address: String,
    session_id: Option<String>,
    session: Option<Arc<HostedInstanceContext>>,
}

impl Channel {
    pub(crate) fn open(host: Arc<HostInner>, address: &str) -> Result<Self> {
        let endpoint = host
            .endpoints
            .get(address)
            .ok_or_else(|| Error::UnknownEndpoint {
                address: address.to_string(),
            })?;
        let session_id = endpoint
            .binding
            .is_sessionful()
            .then(|| Uuid::new_v4().to_string());
        let session = if endpoint.mode == InstanceContextMode::PerSession {
            Some(Arc::new(HostedInstanceContext::open(
                endpoint.mode,
                &host.provider,
                &endpoint.activator,
            )?))
        } else {
            None
        };
        debug!(address, session_id = ?session_id, "Channel opened");
        Ok(Self {
            address: address.to_string(),
            session_id,
            session,
            host,
        })
    }

    /// Endpoint address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Session id, on a sessionful binding
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    fn endpoint(&self) -> Result<&Endpoint> {
        self.host
            .endpoints
            .get(&self.address)
            .ok_or_else(|| Error::UnknownEndpoint {
                address: self.address.clone(),
            })
    }

    fn instance_context(&self, endpoint: &Endpoint) -> Result<Arc<HostedInstanceContext>> {
        match endpoint.mode {
            InstanceContextMode::Single => endpoint
                .single
                .clone()
                .ok_or_else(|| Error::internal("single instance context was not opened")),
            InstanceContextMode::PerSession => self
                .session
                .clone()
                .ok_or_else(|| Error::internal("session instance context was not opened")),
            InstanceContextMode::PerCall => HostedInstanceContext::open(
                InstanceContextMode::PerCall,
                &self.host.provider,
                &endpoint.activator,
            )
            .map(Arc::new),
        }
    }

    /// Send `message` and wait for the outcome
    pub async fn call(&self, message: Message) -> Result<InvocationOutcome> {
        let endpoint = self.endpoint()?;
        let signature = endpoint.operation(&message.action)?;
        let instance_context = self.instance_context(endpoint)?;
        let instance = instance_context.instance().clone();

        let mut context = OperationContext::new(instance_context, message.action, message.properties);
        if let Some(session_id) = &self.session_id {
            context = context.with_session_id(session_id.clone());
        }
        self.host
            .dispatcher
            .dispatch_signature(signature, &instance, message.arguments, context)
            .await
    }

    /// Close the channel, releasing its session
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for Channel {
    fn drop(&mut self) {
        debug!(address = %self.address, session_id = ?self.session_id, "Channel closed");
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("address", &self.address)
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}
