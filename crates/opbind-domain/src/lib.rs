//! Domain Layer - opbind
//!
//! The data model of operation dispatch: signatures and their canonical
//! keys, parameter binding rules, call buffers, the inbound message model
//! and the ports the dispatcher and hosting layer meet at.
//!
//! ## Architecture
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`value_objects`] | Signatures, keys, plans, lifetimes, messages, buffers |
//! | [`canonical`] | The signature canonicalizer |
//! | [`ports`] | Adapter, resolution session and context contracts |
//! | [`error`] | Error type shared by every crate |
//! | [`constants`] | Well-known names |
//!
//! This crate performs no I/O and owns no runtime.

pub mod canonical;
pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use canonical::{canonicalize, normalize_type_name};
pub use error::{Error, Result};
pub use ports::*;
pub use value_objects::*;
