//! Resolution plans for injected parameters

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Binding rule for one injected (non-wire) parameter
///
/// Decided once when the delegation wrapper is generated and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionPlan {
    /// The whole transport context of the inbound message
    TransportContext,
    /// The transport-level request of the inbound message
    TransportRequest,
    /// The transport-level response handle of the inbound message
    TransportResponse,
    /// A named entry of the inbound message's property bag
    MessageProperty {
        /// Property name
        name: Cow<'static, str>,
        /// Declared value type
        type_name: Cow<'static, str>,
    },
    /// A container service resolved by type and key
    KeyedService {
        /// Service key
        key: Cow<'static, str>,
    },
    /// A container service resolved by type only
    DefaultService,
}

impl ResolutionPlan {
    /// Whether the binding reads the message rather than the container
    pub fn reads_message(&self) -> bool {
        !self.reads_container()
    }

    /// Whether the binding resolves from a resolution session
    pub fn reads_container(&self) -> bool {
        matches!(self, Self::KeyedService { .. } | Self::DefaultService)
    }

    /// Whether the binding can fail at call time
    ///
    /// Message properties are best-effort; every other binding fails when
    /// its source is missing.
    pub fn is_fallible(&self) -> bool {
        !matches!(self, Self::MessageProperty { .. })
    }
}

impl fmt::Display for ResolutionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransportContext => f.write_str("transport context"),
            Self::TransportRequest => f.write_str("transport request"),
            Self::TransportResponse => f.write_str("transport response"),
            Self::MessageProperty { name, type_name } => {
                write!(f, "message property '{name}' as {type_name}")
            }
            Self::KeyedService { key } => write!(f, "keyed service '{key}'"),
            Self::DefaultService => f.write_str("default service"),
        }
    }
}
