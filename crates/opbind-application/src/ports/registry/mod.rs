//! Adapter Registration System
//!
//! Generated code registers one invocation adapter per contract operation
//! through a `linkme` distributed slice declared here. Entries are collected
//! by the linker; nothing runs before `main`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  Adapter Registration Flow                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  1. Contract macro emits: #[distributed_slice(INVOCATION_ADAPTERS)]
//! │                           static ENTRY: InvocationAdapterEntry   │
//! │                              ↓                                  │
//! │  2. Registry declares:    #[linkme::distributed_slice]          │
//! │                           pub static INVOCATION_ADAPTERS        │
//! │                              ↓                                  │
//! │  3. Startup:              InvocationRegistry::from_linked()     │
//! │                              ↓                                  │
//! │  4. Seal, then lookup:    registry.lookup(key)                  │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use opbind_application::ports::registry::{InvocationAdapterEntry, INVOCATION_ADAPTERS};
//!
//! #[linkme::distributed_slice(INVOCATION_ADAPTERS)]
//! static CALC_ADD: InvocationAdapterEntry = InvocationAdapterEntry {
//!     signature: &CALC_ADD_SIGNATURE,
//!     factory: || Arc::new(CalculatorAddAdapter),
//! };
//! ```

pub mod invocation;

pub use invocation::{INVOCATION_ADAPTERS, InvocationAdapterEntry, list_invocation_adapters};
