//! Configuration
//!
//! Sources, later ones overriding earlier ones:
//!
//! 1. `AppConfig::default()`
//! 2. `opbind.toml` (explicit path, or the first of `./opbind.toml`,
//!    `./opbind/opbind.toml`, `<config dir>/opbind/opbind.toml`)
//! 3. Environment variables `OPBIND__<SECTION>__<FIELD>`

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, DispatchConfig, HostConfig, LoggingConfig};
