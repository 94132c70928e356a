//! Shared fixtures: a hand-written `Tally` contract and its adapter

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use opbind_application::InvocationRegistry;
use opbind_domain::{
    InputBuffer, InvocationAdapter, InvocationOutcome, OperationSignature, Result, ReturnShape,
    ServiceContract, ServiceInstance, Value, canonicalize,
};

/// Counts the calls served by one instance
pub trait Tally: Send + Sync {
    fn hit(&self) -> usize;
}

#[derive(Default)]
pub struct TallyService {
    hits: AtomicUsize,
}

impl Tally for TallyService {
    fn hit(&self) -> usize {
        self.hits.fetch_add(1, Ordering::SeqCst) + 1
    }
}

pub static HIT: OperationSignature =
    OperationSignature::new_static("tests::Tally", "hit", &[], ReturnShape::Value);

static TALLY_OPERATIONS: [&OperationSignature; 1] = [&HIT];

impl ServiceContract for dyn Tally {
    const NAME: &'static str = "tests::Tally";

    fn operations() -> &'static [&'static OperationSignature] {
        &TALLY_OPERATIONS
    }
}

pub struct HitAdapter;

#[async_trait]
impl InvocationAdapter for HitAdapter {
    fn signature(&self) -> &'static OperationSignature {
        &HIT
    }

    fn allocate_inputs(&self) -> InputBuffer {
        InputBuffer::empty()
    }

    async fn invoke(
        &self,
        instance: &ServiceInstance,
        _inputs: InputBuffer,
    ) -> Result<InvocationOutcome> {
        let service = instance.contract::<dyn Tally>()?;
        let hits = service.hit();
        Ok(InvocationOutcome::new(
            Some(Box::new(hits) as Value),
            Vec::new(),
        ))
    }
}

/// Unsealed registry holding the `Tally::hit` adapter
pub fn tally_registry() -> Arc<InvocationRegistry> {
    let registry = InvocationRegistry::new();
    registry
        .register(&canonicalize(&HIT), Arc::new(HitAdapter))
        .expect("register");
    Arc::new(registry)
}
