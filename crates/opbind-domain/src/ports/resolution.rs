//! Service resolution port
//!
//! What the core consumes from a dependency container: resolve by type,
//! resolve by type and key. Services travel as `Arc<Arc<T>>` erased to
//! [`AnyService`] so that unsized contracts (`dyn Trait`) can be stored.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{Error, Result};

/// Type-erased service handle wrapping an `Arc<T>`
pub type AnyService = Arc<dyn Any + Send + Sync>;

/// Identity of a registration: service type plus optional key
#[derive(Clone)]
pub struct ServiceKey {
    type_id: TypeId,
    type_name: &'static str,
    key: Option<String>,
}

impl ServiceKey {
    /// Key for the default registration of `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            key: None,
        }
    }

    /// Key for the registration of `T` under `key`
    pub fn keyed<T: ?Sized + 'static>(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::of::<T>()
        }
    }

    /// Service type name
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Service key, when keyed
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

impl PartialEq for ServiceKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.key == other.key
    }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.key.hash(state);
    }
}

impl fmt::Debug for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{}[{key}]", self.type_name),
            None => f.write_str(self.type_name),
        }
    }
}

/// A scoped container view from which dependencies are resolved
pub trait ResolutionSession: Send + Sync {
    /// Resolve a registration; `Ok(None)` when nothing is registered under `key`
    fn resolve_service(&self, key: &ServiceKey) -> Result<Option<AnyService>>;
}

/// Typed resolution helpers for every [`ResolutionSession`]
pub trait ResolutionSessionExt {
    /// Resolve `T`, `None` when not registered
    fn try_resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Option<Arc<T>>>;

    /// Resolve `T` under `key`, `None` when not registered
    fn try_resolve_keyed<T: ?Sized + Send + Sync + 'static>(
        &self,
        key: &str,
    ) -> Result<Option<Arc<T>>>;

    /// Resolve `T`, failing when not registered
    fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.try_resolve::<T>()?
            .ok_or_else(|| Error::service_not_registered(type_name::<T>(), None))
    }

    /// Resolve `T` under `key`, failing when not registered
    fn resolve_keyed<T: ?Sized + Send + Sync + 'static>(&self, key: &str) -> Result<Arc<T>> {
        self.try_resolve_keyed::<T>(key)?
            .ok_or_else(|| Error::service_not_registered(type_name::<T>(), Some(key)))
    }
}

impl<S: ResolutionSession + ?Sized> ResolutionSessionExt for S {
    fn try_resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Option<Arc<T>>> {
        self.resolve_service(&ServiceKey::of::<T>())?
            .map(downcast_service::<T>)
            .transpose()
    }

    fn try_resolve_keyed<T: ?Sized + Send + Sync + 'static>(
        &self,
        key: &str,
    ) -> Result<Option<Arc<T>>> {
        self.resolve_service(&ServiceKey::keyed::<T>(key))?
            .map(downcast_service::<T>)
            .transpose()
    }
}

/// Erase a typed service
pub fn erase_service<T: ?Sized + Send + Sync + 'static>(service: Arc<T>) -> AnyService {
    Arc::new(service)
}

/// Recover a typed service from its erased handle
pub fn downcast_service<T: ?Sized + Send + Sync + 'static>(service: AnyService) -> Result<Arc<T>> {
    (service.as_ref() as &dyn Any)
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or_else(|| {
            Error::service_resolution(type_name::<T>(), "registered value has a different type")
        })
}
