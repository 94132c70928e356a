//! Shared fixtures: a hand-written adapter and an in-memory instance context

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use opbind_domain::{
    AnyService, InputBuffer, InstanceContext, InvocationAdapter, InvocationOutcome,
    MessageProperties, OperationContext, OperationSignature, ParameterDescriptor,
    ParameterDirection, ResolutionSession, Result, ReturnShape, ServiceInstance, ServiceKey, Value,
    erase_service,
};

pub trait Counter: Send + Sync {
    fn add(&self, amount: i32, total: &mut i32);
}

pub struct PlainCounter;

impl Counter for PlainCounter {
    fn add(&self, amount: i32, total: &mut i32) {
        *total += amount;
    }
}

pub static ADD_PARAMS: [ParameterDescriptor; 2] = [
    ParameterDescriptor::new_static("amount", "i32", ParameterDirection::In, 0),
    ParameterDescriptor::new_static("total", "i32", ParameterDirection::InOut, 1),
];

pub static ADD: OperationSignature =
    OperationSignature::new_static("tests::Counter", "add", &ADD_PARAMS, ReturnShape::Void);

pub const ADD_KEY: &str = "tests.Counter.add(i32, inout i32)";

pub struct CounterAddAdapter;

#[async_trait]
impl InvocationAdapter for CounterAddAdapter {
    fn signature(&self) -> &'static OperationSignature {
        &ADD
    }

    fn allocate_inputs(&self) -> InputBuffer {
        InputBuffer::with_len(2)
    }

    async fn invoke(
        &self,
        instance: &ServiceInstance,
        mut inputs: InputBuffer,
    ) -> Result<InvocationOutcome> {
        let service = instance.contract::<dyn Counter>()?;
        let amount: i32 = inputs.take(0)?;
        let mut total: i32 = inputs.take(1)?;
        service.add(amount, &mut total);
        Ok(InvocationOutcome::new(None, vec![Box::new(total) as Value]))
    }
}

pub fn counter_adapter() -> Arc<dyn InvocationAdapter> {
    Arc::new(CounterAddAdapter)
}

pub fn counter_instance() -> ServiceInstance {
    let counter: Arc<dyn Counter> = Arc::new(PlainCounter);
    ServiceInstance::new(counter)
}

/// A session over a fixed map that counts its own drops
pub struct MapSession {
    services: HashMap<ServiceKey, AnyService>,
    released: Arc<AtomicUsize>,
}

impl ResolutionSession for MapSession {
    fn resolve_service(&self, key: &ServiceKey) -> Result<Option<AnyService>> {
        Ok(self.services.get(key).cloned())
    }
}

impl Drop for MapSession {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Instance context whose sessions all expose the same greeting service
pub struct FakeInstanceContext {
    pub singleton: bool,
    pub greeting: &'static str,
    pub opened: Arc<AtomicUsize>,
    pub released: Arc<AtomicUsize>,
    ambient: Arc<dyn ResolutionSession>,
}

impl FakeInstanceContext {
    pub fn new(singleton: bool, greeting: &'static str) -> Self {
        let released = Arc::new(AtomicUsize::new(0));
        let ambient = Arc::new(Self::build_session(greeting, Arc::new(AtomicUsize::new(0))));
        Self {
            singleton,
            greeting,
            opened: Arc::new(AtomicUsize::new(0)),
            released,
            ambient,
        }
    }

    fn build_session(greeting: &'static str, released: Arc<AtomicUsize>) -> MapSession {
        let mut services = HashMap::new();
        let value: Arc<String> = Arc::new(greeting.to_string());
        services.insert(ServiceKey::of::<String>(), erase_service(value));
        let keyed: Arc<String> = Arc::new(format!("{greeting}!"));
        services.insert(ServiceKey::keyed::<String>("loud"), erase_service(keyed));
        MapSession { services, released }
    }
}

impl InstanceContext for FakeInstanceContext {
    fn is_singleton(&self) -> bool {
        self.singleton
    }

    fn session(&self) -> Arc<dyn ResolutionSession> {
        Arc::clone(&self.ambient)
    }

    fn create_session(&self) -> Box<dyn ResolutionSession> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Box::new(Self::build_session(self.greeting, Arc::clone(&self.released)))
    }
}

pub fn operation_context(
    instance: Arc<FakeInstanceContext>,
    properties: MessageProperties,
) -> OperationContext {
    OperationContext::new(instance, "add", properties)
}
