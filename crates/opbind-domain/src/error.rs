//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for opbind dispatch and injection
#[derive(Error, Debug)]
pub enum Error {
    /// A transport binding was declared but the inbound message carries no transport context
    #[error("Missing {binding} in inbound message properties")]
    MissingTransportContext {
        /// The binding that could not be satisfied (context, request or response)
        binding: &'static str,
    },

    /// An injected operation ran outside of a dispatched call
    #[error("No operation context is active for the current call")]
    NoOperationContext,

    /// No adapter was registered for a canonical key the dispatcher expected
    #[error("No invocation adapter registered for operation '{key}'")]
    RegistryMiss {
        /// The canonical key that was looked up
        key: String,
    },

    /// Two registrations produced the same canonical key
    #[error("Invocation adapter key '{key}' was registered more than once")]
    RegistryCollision {
        /// The colliding canonical key
        key: String,
    },

    /// A registration was attempted after the registry was sealed
    #[error("Invocation registry is sealed; cannot register '{key}'")]
    RegistrySealed {
        /// The key that was rejected
        key: String,
    },

    /// A required service is not registered in the container
    #[error("Service not registered: {type_name}{}", key.as_ref().map(|k| format!(" (key '{k}')")).unwrap_or_default())]
    ServiceNotRegistered {
        /// Type name of the requested service
        type_name: &'static str,
        /// Optional service key
        key: Option<String>,
    },

    /// A service factory failed or produced a value of the wrong type
    #[error("Failed to resolve service {type_name}: {message}")]
    ServiceResolution {
        /// Type name of the requested service
        type_name: &'static str,
        /// Description of the failure
        message: String,
    },

    /// The service instance handed to an adapter does not implement the adapter's contract
    #[error("Service instance does not implement contract {expected}")]
    InstanceTypeMismatch {
        /// Expected contract type name
        expected: &'static str,
    },

    /// An input slot was left empty by the dispatcher
    #[error("Input slot {position} was not populated")]
    MissingInput {
        /// Index in the input buffer
        position: usize,
    },

    /// An input slot holds a value of the wrong type
    #[error("Input slot {position} does not hold a value of type {expected}")]
    InputTypeMismatch {
        /// Index in the input buffer
        position: usize,
        /// Expected parameter type name
        expected: &'static str,
    },

    /// Wrong number of wire arguments for an operation
    #[error("Operation '{operation}' expects {expected} arguments, got {actual}")]
    ArgumentCount {
        /// Operation name
        operation: String,
        /// Number of input parameters declared
        expected: usize,
        /// Number of arguments supplied
        actual: usize,
    },

    /// The message action does not name an operation of the endpoint's contract
    #[error("Unknown operation '{action}' on contract {contract}")]
    UnknownOperation {
        /// Contract name
        contract: &'static str,
        /// Requested action
        action: String,
    },

    /// No endpoint is listening on the requested address
    #[error("No endpoint registered at '{address}'")]
    UnknownEndpoint {
        /// Requested address
        address: String,
    },

    /// Error raised by the user operation itself, carried unchanged
    #[error("Operation failed: {0}")]
    Operation(Box<dyn std::error::Error + Send + Sync>),

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Infrastructure operation error
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Registry error creation methods
impl Error {
    /// Create a registry miss error
    pub fn registry_miss<S: Into<String>>(key: S) -> Self {
        Self::RegistryMiss { key: key.into() }
    }

    /// Create a registry collision error
    pub fn registry_collision<S: Into<String>>(key: S) -> Self {
        Self::RegistryCollision { key: key.into() }
    }

    /// Create a sealed registry error
    pub fn registry_sealed<S: Into<String>>(key: S) -> Self {
        Self::RegistrySealed { key: key.into() }
    }
}

// Resolution error creation methods
impl Error {
    /// Create a missing service error
    pub fn service_not_registered(type_name: &'static str, key: Option<&str>) -> Self {
        Self::ServiceNotRegistered {
            type_name,
            key: key.map(str::to_string),
        }
    }

    /// Create a service resolution error
    pub fn service_resolution<S: Into<String>>(type_name: &'static str, message: S) -> Self {
        Self::ServiceResolution {
            type_name,
            message: message.into(),
        }
    }
}

// Operation error creation methods
impl Error {
    /// Wrap an error raised by a user operation without transforming it
    ///
    /// An operation that already fails with this crate's [`Error`] (for
    /// instance a resolution failure raised inside a delegation wrapper)
    /// is passed through as is.
    pub fn operation<E: std::error::Error + Send + Sync + 'static>(source: E) -> Self {
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(source);
        match boxed.downcast::<Self>() {
            Ok(own) => *own,
            Err(other) => Self::Operation(other),
        }
    }

    /// Borrow the user operation error, if this is one
    pub fn as_operation(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Operation(source) => Some(source.as_ref()),
            _ => None,
        }
    }

    /// Recover the user operation error as its original type
    pub fn downcast_operation<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.as_operation().and_then(|source| source.downcast_ref::<E>())
    }
}

// Configuration and infrastructure error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an infrastructure error
    pub fn infrastructure<S: Into<String>>(message: S) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: None,
        }
    }

    /// Create an infrastructure error with source
    pub fn infrastructure_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl Error {
    /// Whether this error signals a startup-integrity fault rather than a per-call failure
    pub fn is_startup_integrity(&self) -> bool {
        matches!(
            self,
            Self::RegistryMiss { .. }
                | Self::RegistryCollision { .. }
                | Self::RegistrySealed { .. }
        )
    }
}
