//! Application ports
//!
//! - [`registry`]: link-time registration slices

pub mod registry;

pub use registry::*;
