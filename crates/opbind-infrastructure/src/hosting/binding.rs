//! Endpoint bindings

use std::fmt;

use crate::config::HostConfig;
use crate::constants::{BINDING_BASIC_HTTP, BINDING_NET_TCP};

/// Transport binding of an endpoint; only its session capability matters here
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    name: String,
    sessionful: bool,
}

impl Binding {
    /// Create a binding
    pub fn new(name: impl Into<String>, sessionful: bool) -> Self {
        Self {
            name: name.into(),
            sessionful,
        }
    }

    /// Request/response binding without sessions
    pub fn basic_http() -> Self {
        Self::new(BINDING_BASIC_HTTP, false)
    }

    /// Connection-oriented binding with sessions
    pub fn net_tcp() -> Self {
        Self::new(BINDING_NET_TCP, true)
    }

    /// Binding named `name`, sessionful when listed in the host configuration
    pub fn from_config(name: &str, config: &HostConfig) -> Self {
        Self::new(name, config.is_sessionful(name))
    }

    /// Binding name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether channels of this binding carry a session
    pub fn is_sessionful(&self) -> bool {
        self.sessionful
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
