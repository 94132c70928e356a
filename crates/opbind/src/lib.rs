//! # opbind
//!
//! Operation dispatch adaptation for service hosts.
//!
//! A contract trait becomes a set of generated invocation adapters, one per
//! operation, registered under a canonical key. An implementation can take
//! extra parameters (transport context, message properties, container
//! services) that are resolved per call by a generated delegation wrapper.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use opbind::{Binding, Message, ServiceCollection, ServiceHost};
//!
//! #[opbind::service_contract(namespace = "calc")]
//! pub trait Calculator {
//!     fn add(&self, a: i32, b: i32) -> i32;
//! }
//!
//! pub struct CalculatorService;
//!
//! #[opbind::service_impl(Calculator)]
//! impl CalculatorService {
//!     #[operation]
//!     fn add(&self, a: i32, b: i32, #[inject] clock: Arc<dyn Clock>) -> opbind::Result<i32> {
//!         Ok(a + b)
//!     }
//! }
//!
//! let host = ServiceHost::builder(services)
//!     .add_service_endpoint::<CalculatorService, dyn Calculator>("calc", Binding::basic_http(), |s| s)
//!     .open()?;
//! let outcome = host.create_channel("calc")?
//!     .call(Message::new("add").with_argument(1).with_argument(2))
//!     .await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - signatures, canonical keys, ports and the error type
//! - `application` - invocation registry, injection runtime, dispatcher
//! - `infrastructure` - service container, host, configuration, logging

/// Domain layer - signatures, keys, ports and errors
pub mod domain {
    pub use opbind_domain::*;
}

/// Application layer - registry, injection runtime and dispatch
pub mod application {
    pub use opbind_application::*;
}

/// Infrastructure layer - container, hosting, configuration and logging
pub mod infrastructure {
    pub use opbind_infrastructure::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::*;

pub use application::{
    INVOCATION_ADAPTERS, InjectionScope, InvocationAdapterEntry, InvocationRegistry,
    OperationDispatcher, RegistrationOutcome,
};
pub use infrastructure::{
    AppConfig, Binding, Channel, ConfigLoader, ServiceCollection, ServiceHost, ServiceHostBuilder,
    ServiceProvider, ServiceScope,
};
pub use opbind_macros::{service_contract, service_impl};

// Paths used by generated code
pub use async_trait::async_trait;
pub use linkme;
