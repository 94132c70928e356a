//! Configuration types

use std::path::PathBuf;

use opbind_domain::InstanceContextMode;
use serde::{Deserialize, Serialize};

use crate::constants::{BINDING_NET_TCP, DEFAULT_LOG_LEVEL};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Dispatch configuration
    pub dispatch: DispatchConfig,
    /// Hosting configuration
    pub host: HostConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON output format
    pub json_format: bool,

    /// Log to a daily-rotated file in addition to stdout
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
            file_output: None,
        }
    }
}

/// Dispatch configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Fail registry sealing when two registrations share a canonical key
    pub reject_key_collisions: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            reject_key_collisions: true,
        }
    }
}

/// Hosting configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Mode for endpoints added without an explicit one
    pub default_instance_context_mode: InstanceContextMode,
    /// Binding names that carry sessions
    pub sessionful_bindings: Vec<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            default_instance_context_mode: InstanceContextMode::default(),
            sessionful_bindings: vec![BINDING_NET_TCP.to_string()],
        }
    }
}

impl HostConfig {
    /// Whether the named binding carries sessions
    pub fn is_sessionful(&self, binding: &str) -> bool {
        self.sessionful_bindings.iter().any(|b| b == binding)
    }
}
