//! Service registrations

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use opbind_domain::{
    AnyService, ResolutionSession, Result, ServiceKey, ServiceLifetime, erase_service,
};
use tracing::debug;

use crate::di::provider::ServiceProvider;

/// Type-erased service factory
pub(crate) type Factory = Arc<dyn Fn(&dyn ResolutionSession) -> Result<AnyService> + Send + Sync>;

/// One registration: how long instances live and how they are built
#[derive(Clone)]
pub(crate) struct Registration {
    pub(crate) lifetime: ServiceLifetime,
    pub(crate) factory: Factory,
}

/// Mutable set of registrations, turned into a provider by [`build`](Self::build)
///
/// Registering the same type (and key) again replaces the previous
/// registration.
#[derive(Clone, Default)]
pub struct ServiceCollection {
    registrations: HashMap<ServiceKey, Registration>,
}

fn erase<T, F>(factory: F) -> Factory
where
    T: ?Sized + Send + Sync + 'static,
    F: Fn(&dyn ResolutionSession) -> Result<Arc<T>> + Send + Sync + 'static,
{
    Arc::new(move |session: &dyn ResolutionSession| {
        factory(session).map(erase_service)
    })
}

impl ServiceCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under `key` with `lifetime`
    #[must_use]
    pub fn add<T, F>(mut self, key: ServiceKey, lifetime: ServiceLifetime, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ResolutionSession) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        debug!(service = ?key, %lifetime, "Registering service");
        self.registrations.insert(
            key,
            Registration {
                lifetime,
                factory: erase(factory),
            },
        );
        self
    }

    /// Register a singleton `T`
    #[must_use]
    pub fn add_singleton<T, F>(self, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ResolutionSession) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.add(ServiceKey::of::<T>(), ServiceLifetime::Singleton, factory)
    }

    /// Register a scoped `T`
    #[must_use]
    pub fn add_scoped<T, F>(self, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ResolutionSession) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.add(ServiceKey::of::<T>(), ServiceLifetime::Scoped, factory)
    }

    /// Register a transient `T`
    #[must_use]
    pub fn add_transient<T, F>(self, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ResolutionSession) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.add(ServiceKey::of::<T>(), ServiceLifetime::Transient, factory)
    }

    /// Register a singleton `T` under `key`
    #[must_use]
    pub fn add_keyed_singleton<T, F>(self, key: &str, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ResolutionSession) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.add(ServiceKey::keyed::<T>(key), ServiceLifetime::Singleton, factory)
    }

    /// Register a scoped `T` under `key`
    #[must_use]
    pub fn add_keyed_scoped<T, F>(self, key: &str, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ResolutionSession) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.add(ServiceKey::keyed::<T>(key), ServiceLifetime::Scoped, factory)
    }

    /// Register a transient `T` under `key`
    #[must_use]
    pub fn add_keyed_transient<T, F>(self, key: &str, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ResolutionSession) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.add(ServiceKey::keyed::<T>(key), ServiceLifetime::Transient, factory)
    }

    /// Register an existing instance as a singleton
    #[must_use]
    pub fn add_instance<T: ?Sized + Send + Sync + 'static>(self, instance: Arc<T>) -> Self {
        self.add_singleton::<T, _>(move |_| Ok(Arc::clone(&instance)))
    }

    /// Lifetime registered for `key`
    pub fn lifetime_of(&self, key: &ServiceKey) -> Option<ServiceLifetime> {
        self.registrations.get(key).map(|r| r.lifetime)
    }

    /// Whether `key` is registered
    pub fn contains(&self, key: &ServiceKey) -> bool {
        self.registrations.contains_key(key)
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Build the root provider
    pub fn build(self) -> ServiceProvider {
        ServiceProvider::from_registrations(self.registrations)
    }
}

impl fmt::Debug for ServiceCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCollection")
            .field("registrations", &self.registrations.keys().collect::<Vec<_>>())
            .finish()
    }
}
