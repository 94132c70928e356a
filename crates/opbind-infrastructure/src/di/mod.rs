//! Service Container
//!
//! A small dependency container with the three registration lifetimes the
//! hosting layer understands, and keyed registrations.
//!
//! ```text
//! ServiceCollection ──build()──▶ ServiceProvider (root)
//!                                   │  singletons, root-scoped cache
//!                                   │
//!                                   └─create_scope()──▶ ServiceScope
//!                                                         scoped cache,
//!                                                         released on drop
//! ```
//!
//! | Lifetime | From the provider | From a scope |
//! |----------|-------------------|--------------|
//! | Singleton | one per provider | the provider's instance |
//! | Scoped | one per provider (root scope) | one per scope |
//! | Transient | new every time | new every time |

pub mod collection;
pub mod provider;

pub use collection::ServiceCollection;
pub use provider::{ServiceProvider, ServiceScope};
