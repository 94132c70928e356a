//! Infrastructure Layer - opbind
//!
//! Cross-cutting technical concerns around dispatch: configuration,
//! logging, a service container and the service host.
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | Figment-based configuration loading |
//! | [`logging`] | Tracing subscriber setup |
//! | [`di`] | Service collection, provider and scopes |
//! | [`hosting`] | Service host, endpoints, instance contexts and channels |
//! | [`error_ext`] | Context helpers for foreign errors |
//! | [`constants`] | Infrastructure constants |

pub mod config;
pub mod constants;
pub mod di;
pub mod error_ext;
pub mod hosting;
pub mod logging;

pub use config::{AppConfig, ConfigLoader, DispatchConfig, HostConfig, LoggingConfig};
pub use di::{ServiceCollection, ServiceProvider, ServiceScope};
pub use error_ext::ErrorContext;
pub use hosting::{Binding, Channel, HostedInstanceContext, ServiceHost, ServiceHostBuilder};
