//! Service Hosting
//!
//! Hosts service implementations behind endpoints and decides which
//! instance serves each call.
//!
//! ```text
//! ServiceHostBuilder ──open()──▶ ServiceHost
//!   add_service_endpoint           │  validates every operation key
//!                                  │  against the sealed registry
//!                                  ▼
//!                          create_channel(address) ──▶ Channel
//!                                                        │ call(Message)
//!                                                        ▼
//!                     instance context (Single / PerSession / PerCall)
//!                                                        │
//!                                                        ▼
//!                                              OperationDispatcher
//! ```
//!
//! Effective instance mode: services registered `Singleton` or `Scoped`
//! are hosted as `Single`; `Transient` services honour the declared mode.
//! `PerSession` on a binding without sessions is hosted as `PerCall`.

pub mod binding;
pub mod channel;
pub mod endpoint;
pub mod host;
pub mod instance;

pub use binding::Binding;
pub use channel::Channel;
pub use endpoint::Endpoint;
pub use host::{ServiceHost, ServiceHostBuilder};
pub use instance::HostedInstanceContext;
