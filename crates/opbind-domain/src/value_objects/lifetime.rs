//! Service lifetimes and instance context modes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Lifetime a service was registered with in the container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceLifetime {
    /// One instance for the whole provider
    Singleton,
    /// One instance per resolution scope
    Scoped,
    /// A new instance on every resolution
    Transient,
}

/// Declared hosting policy for service instances
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceContextMode {
    /// A new instance for every call
    PerCall,
    /// One instance per channel session
    #[default]
    PerSession,
    /// One instance for the lifetime of the host
    Single,
}

impl InstanceContextMode {
    /// Mode actually used to host a service
    ///
    /// A service the container already shares (singleton or scoped) is
    /// resolved once from the root provider, so it is hosted as `Single`
    /// whatever was declared. Transient services honour the declared mode.
    pub const fn effective(declared: Self, lifetime: ServiceLifetime) -> Self {
        match lifetime {
            ServiceLifetime::Singleton | ServiceLifetime::Scoped => Self::Single,
            ServiceLifetime::Transient => declared,
        }
    }

    /// Mode used on a binding without sessions
    pub const fn without_sessions(self) -> Self {
        match self {
            Self::PerSession => Self::PerCall,
            other => other,
        }
    }

    /// Whether instances of this mode are process-wide singletons
    pub const fn is_singleton(self) -> bool {
        matches!(self, Self::Single)
    }
}

impl fmt::Display for ServiceLifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Singleton => "singleton",
            Self::Scoped => "scoped",
            Self::Transient => "transient",
        })
    }
}

impl fmt::Display for InstanceContextMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PerCall => "per_call",
            Self::PerSession => "per_session",
            Self::Single => "single",
        })
    }
}

impl FromStr for InstanceContextMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "per_call" | "percall" => Ok(Self::PerCall),
            "per_session" | "persession" => Ok(Self::PerSession),
            "single" => Ok(Self::Single),
            other => Err(Error::configuration(format!(
                "Unknown instance context mode '{other}'"
            ))),
        }
    }
}
