//! Invocation Registry
//!
//! Maps canonical keys to invocation adapters. The registry is written
//! during startup and then sealed; after sealing the map is immutable and
//! lookups take no lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use opbind_domain::{CanonicalKey, Error, InvocationAdapter, Result, canonicalize};
use tracing::{debug, error, warn};

use crate::ports::registry::{INVOCATION_ADAPTERS, InvocationAdapterEntry};

/// Outcome of a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The key was new
    Inserted,
    /// The key existed and its adapter was replaced
    Replaced,
}

/// Canonical key to adapter map with an explicit sealed phase
///
/// A registration checks the sealing flag while holding the shard guard of
/// its key, and sealing raises the flag before reading the shards. Every
/// write either lands in the sealed map or fails with `RegistrySealed`.
#[derive(Default)]
pub struct InvocationRegistry {
    staging: DashMap<String, Arc<dyn InvocationAdapter>>,
    collisions: DashMap<String, usize>,
    sealing: AtomicBool,
    sealed: OnceLock<HashMap<String, Arc<dyn InvocationAdapter>>>,
}

impl InvocationRegistry {
    /// Create an empty, unsealed registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unsealed registry staged with every linked adapter
    pub fn from_linked() -> Result<Self> {
        Self::from_entries(&INVOCATION_ADAPTERS)
    }

    /// Create an unsealed registry staged with `entries`
    ///
    /// Each entry is keyed by the canonical key of its signature.
    pub fn from_entries(entries: &[InvocationAdapterEntry]) -> Result<Self> {
        let registry = Self::new();
        for entry in entries {
            registry.register(&canonicalize(entry.signature), (entry.factory)())?;
        }
        debug!(count = entries.len(), "Staged linked invocation adapters");
        Ok(registry)
    }

    /// Process-wide registry built from the linked adapters and sealed
    ///
    /// Key collisions among linked adapters are rejected.
    pub fn global() -> Result<Arc<Self>> {
        static GLOBAL: OnceLock<Arc<InvocationRegistry>> = OnceLock::new();

        if let Some(registry) = GLOBAL.get() {
            return Ok(Arc::clone(registry));
        }
        let registry = Self::from_linked()?;
        registry.seal(true)?;
        Ok(Arc::clone(GLOBAL.get_or_init(|| Arc::new(registry))))
    }

    /// Register an adapter under `key`
    ///
    /// Registering an existing key replaces its adapter; the replacement is
    /// logged and recorded as a collision. Fails once sealing has begun.
    pub fn register(
        &self,
        key: &CanonicalKey,
        adapter: Arc<dyn InvocationAdapter>,
    ) -> Result<RegistrationOutcome> {
        let entry = self.staging.entry(key.to_string());
        if self.sealing.load(Ordering::SeqCst) {
            return Err(Error::registry_sealed(key.as_str()));
        }
        match entry {
            Entry::Occupied(mut occupied) => {
                occupied.insert(adapter);
                warn!(key = %key, "Invocation adapter replaced an existing registration");
                *self.collisions.entry(key.to_string()).or_insert(0) += 1;
                Ok(RegistrationOutcome::Replaced)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(adapter);
                debug!(key = %key, "Registered invocation adapter");
                Ok(RegistrationOutcome::Inserted)
            }
        }
    }

    /// Keys registered more than once so far, sorted
    pub fn collisions(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.collisions.iter().map(|e| e.key().clone()).collect();
        keys.sort_unstable();
        keys
    }

    /// Freeze the registry
    ///
    /// With `reject_collisions`, fails with `RegistryCollision` when any key
    /// was registered twice and leaves the registry unsealed. Sealing an
    /// already sealed registry is a no-op.
    pub fn seal(&self, reject_collisions: bool) -> Result<()> {
        if self.is_sealed() {
            return Ok(());
        }
        if self
            .sealing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return if self.is_sealed() {
                Ok(())
            } else {
                Err(Error::internal("invocation registry is already being sealed"))
            };
        }

        let adapters: HashMap<String, Arc<dyn InvocationAdapter>> = self
            .staging
            .iter()
            .map(|e| (e.key().clone(), Arc::clone(e.value())))
            .collect();

        if reject_collisions && let Some(key) = self.collisions().into_iter().next() {
            error!(key = %key, "Invocation registry has colliding keys");
            self.sealing.store(false, Ordering::SeqCst);
            return Err(Error::registry_collision(key));
        }

        let count = adapters.len();
        if self.sealed.set(adapters).is_ok() {
            debug!(count, "Invocation registry sealed");
        }
        Ok(())
    }

    /// Whether the registry has been sealed
    pub fn is_sealed(&self) -> bool {
        self.sealed.get().is_some()
    }

    /// Look up the adapter for `key`
    ///
    /// A miss is a startup-integrity fault and is logged as an error.
    pub fn lookup(&self, key: &str) -> Result<Arc<dyn InvocationAdapter>> {
        let found = match self.sealed.get() {
            Some(adapters) => adapters.get(key).cloned(),
            None => self.staging.get(key).map(|e| Arc::clone(e.value())),
        };
        found.ok_or_else(|| {
            error!(key, "No invocation adapter registered");
            Error::registry_miss(key)
        })
    }

    /// Whether an adapter is registered for `key`
    pub fn contains(&self, key: &str) -> bool {
        match self.sealed.get() {
            Some(adapters) => adapters.contains_key(key),
            None => self.staging.contains_key(key),
        }
    }

    /// Number of registered adapters
    pub fn len(&self) -> usize {
        match self.sealed.get() {
            Some(adapters) => adapters.len(),
            None => self.staging.len(),
        }
    }

    /// Whether no adapter is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = match self.sealed.get() {
            Some(adapters) => adapters.keys().cloned().collect(),
            None => self.staging.iter().map(|e| e.key().clone()).collect(),
        };
        keys.sort_unstable();
        keys
    }
}

impl fmt::Debug for InvocationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationRegistry")
            .field("sealed", &self.is_sealed())
            .field("adapters", &self.len())
            .finish()
    }
}
