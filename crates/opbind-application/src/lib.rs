//! Application Layer - opbind
//!
//! Orchestrates dispatch on top of the domain model.
//!
//! ## Architecture
//!
//! The application layer:
//! - Declares the linked registry slice that generated adapters join
//! - Builds and seals the invocation registry
//! - Carries the per-call operation context across the invocation
//! - Provides the injection runtime delegation wrappers call into
//! - Implements the dispatch use case
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `opbind-domain`: signatures, canonical keys and ports
//! - `tokio` for the task-local call context, `linkme` for registration

pub mod domain_services;
pub mod ports;
pub mod use_cases;

pub use domain_services::{InjectionScope, InvocationRegistry, RegistrationOutcome};
pub use ports::registry::{INVOCATION_ADAPTERS, InvocationAdapterEntry, list_invocation_adapters};
pub use use_cases::OperationDispatcher;
