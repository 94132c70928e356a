//! Service host

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use opbind_application::{InvocationRegistry, OperationDispatcher};
use opbind_domain::{
    Error, InstanceContextMode, OperationSignature, ResolutionSession, ResolutionSessionExt,
    Result, ServiceContract, ServiceInstance, ServiceKey, canonicalize,
};
use tracing::{debug, error, info};

use crate::config::AppConfig;
use crate::di::{ServiceCollection, ServiceProvider};
use crate::hosting::binding::Binding;
use crate::hosting::channel::Channel;
use crate::hosting::endpoint::Endpoint;
use crate::hosting::instance::{Activator, HostedInstanceContext};

struct EndpointSpec {
    address: String,
    contract: &'static str,
    operations: &'static [&'static OperationSignature],
    service: ServiceKey,
    declared: Option<InstanceContextMode>,
    binding: Binding,
    activator: Activator,
}

/// Builder for a [`ServiceHost`]
pub struct ServiceHostBuilder {
    services: ServiceCollection,
    config: AppConfig,
    registry: Option<Arc<InvocationRegistry>>,
    endpoints: Vec<EndpointSpec>,
}

impl ServiceHostBuilder {
    /// Create a builder over `services`
    pub fn new(services: ServiceCollection) -> Self {
        Self {
            services,
            config: AppConfig::default(),
            registry: None,
            endpoints: Vec::new(),
        }
    }

    /// Use `config` for defaults and registry sealing
    #[must_use]
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Dispatch through `registry` instead of the process-wide one
    ///
    /// The registry is sealed when the host opens.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<InvocationRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Binding named `name`, sessionful when the host configuration says so
    pub fn binding(&self, name: &str) -> Binding {
        Binding::from_config(name, &self.config.host)
    }

    /// Serve contract `C` at `address`, backed by the registered service `S`
    ///
    /// Uses the configured default instance context mode. `cast` turns the
    /// resolved service into the contract object, usually `|s| s`.
    #[must_use]
    pub fn add_service_endpoint<S, C>(
        self,
        address: impl Into<String>,
        binding: Binding,
        cast: fn(Arc<S>) -> Arc<C>,
    ) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        C: ?Sized + ServiceContract + Send + Sync,
    {
        self.push_endpoint(address.into(), None, binding, cast)
    }

    /// Serve contract `C` at `address` with a declared instance context mode
    #[must_use]
    pub fn add_service_endpoint_with_mode<S, C>(
        self,
        address: impl Into<String>,
        mode: InstanceContextMode,
        binding: Binding,
        cast: fn(Arc<S>) -> Arc<C>,
    ) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        C: ?Sized + ServiceContract + Send + Sync,
    {
        self.push_endpoint(address.into(), Some(mode), binding, cast)
    }

    fn push_endpoint<S, C>(
        mut self,
        address: String,
        declared: Option<InstanceContextMode>,
        binding: Binding,
        cast: fn(Arc<S>) -> Arc<C>,
    ) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        C: ?Sized + ServiceContract + Send + Sync,
    {
        let activator: Activator = Arc::new(move |session: &dyn ResolutionSession| {
            let service = session.resolve::<S>()?;
            Ok(ServiceInstance::new::<C>(cast(service)))
        });
        self.endpoints.push(EndpointSpec {
            address,
            contract: C::NAME,
            operations: C::operations(),
            service: ServiceKey::of::<S>(),
            declared,
            binding,
            activator,
        });
        self
    }

    /// Validate every endpoint and open the host
    ///
    /// Fails when a served service is not registered, an address is used
    /// twice, or an operation has no registered adapter.
    pub fn open(self) -> Result<ServiceHost> {
        let registry = match self.registry {
            Some(registry) => {
                registry.seal(self.config.dispatch.reject_key_collisions)?;
                registry
            }
            None => InvocationRegistry::global()?,
        };

        let lifetimes: Vec<_> = self
            .endpoints
            .iter()
            .map(|spec| self.services.lifetime_of(&spec.service))
            .collect();
        let provider = self.services.build();
        let default_mode = self.config.host.default_instance_context_mode;

        let mut endpoints = HashMap::new();
        for (spec, lifetime) in self.endpoints.into_iter().zip(lifetimes) {
            let lifetime = lifetime.ok_or_else(|| {
                error!(address = %spec.address, service = ?spec.service, "Hosted service is not registered");
                Error::service_not_registered(spec.service.type_name(), spec.service.key())
            })?;
            validate_operations(&registry, &spec)?;

            let declared = spec.declared.unwrap_or(default_mode);
            let mut mode = InstanceContextMode::effective(declared, lifetime);
            if !spec.binding.is_sessionful() {
                mode = mode.without_sessions();
            }
            let single = if mode.is_singleton() {
                Some(Arc::new(HostedInstanceContext::open(
                    mode,
                    &provider,
                    &spec.activator,
                )?))
            } else {
                None
            };
            debug!(
                address = %spec.address,
                contract = spec.contract,
                %declared,
                %lifetime,
                %mode,
                binding = %spec.binding,
                "Endpoint opened"
            );

            let endpoint = Endpoint {
                address: spec.address.clone(),
                contract: spec.contract,
                operations: spec.operations,
                declared,
                mode,
                binding: spec.binding,
                activator: spec.activator,
                single,
            };
            if endpoints.insert(spec.address.clone(), endpoint).is_some() {
                return Err(Error::configuration(format!(
                    "Endpoint address '{}' is used more than once",
                    spec.address
                )));
            }
        }

        info!(endpoints = endpoints.len(), adapters = registry.len(), "Service host opened");
        Ok(ServiceHost {
            inner: Arc::new(HostInner {
                provider,
                dispatcher: OperationDispatcher::new(registry),
                endpoints,
            }),
        })
    }
}

fn validate_operations(registry: &InvocationRegistry, spec: &EndpointSpec) -> Result<()> {
    for signature in spec.operations {
        let key = canonicalize(signature);
        if !registry.contains(key.as_str()) {
            error!(address = %spec.address, key = %key, "Endpoint operation has no invocation adapter");
            return Err(Error::registry_miss(key.into_string()));
        }
    }
    Ok(())
}

impl fmt::Debug for ServiceHostBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceHostBuilder")
            .field("services", &self.services)
            .field("endpoints", &self.endpoints.len())
            .finish_non_exhaustive()
    }
}

pub(crate) struct HostInner {
    pub(crate) provider: ServiceProvider,
    pub(crate) dispatcher: OperationDispatcher,
    pub(crate) endpoints: HashMap<String, Endpoint>,
}

/// An opened service host
#[derive(Clone)]
pub struct ServiceHost {
    inner: Arc<HostInner>,
}

impl ServiceHost {
    /// Start building a host over `services`
    pub fn builder(services: ServiceCollection) -> ServiceHostBuilder {
        ServiceHostBuilder::new(services)
    }

    /// Root service provider
    pub fn provider(&self) -> &ServiceProvider {
        &self.inner.provider
    }

    /// Registry used for dispatch
    pub fn registry(&self) -> &Arc<InvocationRegistry> {
        self.inner.dispatcher.registry()
    }

    /// Endpoint at `address`
    pub fn endpoint(&self, address: &str) -> Option<&Endpoint> {
        self.inner.endpoints.get(address)
    }

    /// Endpoint addresses, sorted
    pub fn addresses(&self) -> Vec<&str> {
        let mut addresses: Vec<&str> = self.inner.endpoints.keys().map(String::as_str).collect();
        addresses.sort_unstable();
        addresses
    }

    /// Open a channel to the endpoint at `address`
    pub fn create_channel(&self, address: &str) -> Result<Channel> {
        Channel::open(Arc::clone(&self.inner), address)
    }
}

impl fmt::Debug for ServiceHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceHost")
            .field("addresses", &self.addresses())
            .finish_non_exhaustive()
    }
}
