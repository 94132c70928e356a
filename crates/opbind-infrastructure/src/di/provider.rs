//! Service provider and scopes

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use opbind_domain::{AnyService, ResolutionSession, Result, ServiceKey, ServiceLifetime};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::di::collection::Registration;

type InstanceCache = DashMap<ServiceKey, AnyService>;

/// Return the cached instance for `key`, building it on a miss
///
/// The factory runs without a shard guard held so that it can resolve
/// its own dependencies through the same cache. When two callers race,
/// the first insert wins.
fn cached(
    cache: &InstanceCache,
    key: &ServiceKey,
    build: impl FnOnce() -> Result<AnyService>,
) -> Result<AnyService> {
    if let Some(found) = cache.get(key) {
        return Ok(Arc::clone(found.value()));
    }
    let created = build()?;
    let entry = cache.entry(key.clone()).or_insert(created);
    Ok(Arc::clone(entry.value()))
}

struct ProviderInner {
    registrations: HashMap<ServiceKey, Registration>,
    singletons: InstanceCache,
    root_scoped: InstanceCache,
}

/// Root service provider
///
/// Clones share the same registrations and instance caches.
#[derive(Clone)]
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

impl ServiceProvider {
    pub(crate) fn from_registrations(registrations: HashMap<ServiceKey, Registration>) -> Self {
        debug!(count = registrations.len(), "Service provider built");
        Self {
            inner: Arc::new(ProviderInner {
                registrations,
                singletons: DashMap::new(),
                root_scoped: DashMap::new(),
            }),
        }
    }

    /// Open a new resolution scope
    pub fn create_scope(&self) -> ServiceScope {
        let scope = ServiceScope {
            provider: self.clone(),
            id: Uuid::new_v4(),
            scoped: DashMap::new(),
        };
        trace!(scope = %scope.id, "Service scope opened");
        scope
    }

    /// Lifetime registered for `key`
    pub fn lifetime_of(&self, key: &ServiceKey) -> Option<ServiceLifetime> {
        self.inner.registrations.get(key).map(|r| r.lifetime)
    }

    fn singleton(&self, key: &ServiceKey, registration: &Registration) -> Result<AnyService> {
        cached(&self.inner.singletons, key, || {
            trace!(service = ?key, "Creating singleton");
            (registration.factory)(self)
        })
    }
}

impl ResolutionSession for ServiceProvider {
    fn resolve_service(&self, key: &ServiceKey) -> Result<Option<AnyService>> {
        let Some(registration) = self.inner.registrations.get(key) else {
            return Ok(None);
        };
        let service = match registration.lifetime {
            ServiceLifetime::Singleton => self.singleton(key, registration)?,
            ServiceLifetime::Scoped => cached(&self.inner.root_scoped, key, || {
                (registration.factory)(self)
            })?,
            ServiceLifetime::Transient => (registration.factory)(self)?,
        };
        Ok(Some(service))
    }
}

impl fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("registrations", &self.inner.registrations.len())
            .finish_non_exhaustive()
    }
}

/// A resolution scope
///
/// Scoped services are created once per scope and released when the
/// scope is dropped. Singletons come from the root provider.
pub struct ServiceScope {
    provider: ServiceProvider,
    id: Uuid,
    scoped: InstanceCache,
}

impl ServiceScope {
    /// Scope identifier, for logs
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Provider the scope was opened from
    pub fn provider(&self) -> &ServiceProvider {
        &self.provider
    }

    /// Number of scoped instances created so far
    pub fn scoped_len(&self) -> usize {
        self.scoped.len()
    }
}

impl ResolutionSession for ServiceScope {
    fn resolve_service(&self, key: &ServiceKey) -> Result<Option<AnyService>> {
        let Some(registration) = self.provider.inner.registrations.get(key) else {
            return Ok(None);
        };
        let service = match registration.lifetime {
            ServiceLifetime::Singleton => self.provider.singleton(key, registration)?,
            ServiceLifetime::Scoped => {
                cached(&self.scoped, key, || (registration.factory)(self))?
            }
            ServiceLifetime::Transient => (registration.factory)(self)?,
        };
        Ok(Some(service))
    }
}

impl Drop for ServiceScope {
    fn drop(&mut self) {
        let released = self.scoped.len();
        self.scoped.clear();
        trace!(scope = %self.id, released, "Service scope released");
    }
}

impl fmt::Debug for ServiceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceScope")
            .field("id", &self.id)
            .field("scoped", &self.scoped_len())
            .finish()
    }
}
