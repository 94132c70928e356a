//! Instance reuse across calls for every lifetime and instance context mode
//!
//! Each sequence is two calls on one channel, then one call on a new
//! channel. The operation reports how many times its instance was hit.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use opbind::{
    Binding, InstanceContextMode, ServiceCollection, ServiceHost, ServiceLifetime, ServiceKey,
};

use crate::support::call_for;

#[opbind::service_contract(namespace = "matrix")]
pub trait Visits {
    fn visit(&self) -> usize;
}

#[derive(Default)]
pub struct VisitCounter {
    visits: AtomicUsize,
}

impl Visits for VisitCounter {
    fn visit(&self) -> usize {
        self.visits.fetch_add(1, Ordering::SeqCst) + 1
    }
}

fn open(lifetime: ServiceLifetime, mode: InstanceContextMode, binding: Binding) -> ServiceHost {
    let services = ServiceCollection::new().add::<VisitCounter, _>(
        ServiceKey::of::<VisitCounter>(),
        lifetime,
        |_| Ok(Arc::new(VisitCounter::default())),
    );
    ServiceHost::builder(services)
        .add_service_endpoint_with_mode::<VisitCounter, dyn Visits>("visits", mode, binding, |s| s)
        .open()
        .unwrap()
}

async fn sequence(lifetime: ServiceLifetime, mode: InstanceContextMode, binding: Binding) -> [usize; 3] {
    let host = open(lifetime, mode, binding);
    let first = host.create_channel("visits").unwrap();
    let a = call_for::<usize>(&first, "visit").await;
    let b = call_for::<usize>(&first, "visit").await;
    first.close();
    let second = host.create_channel("visits").unwrap();
    let c = call_for::<usize>(&second, "visit").await;
    [a, b, c]
}

#[tokio::test]
async fn test_singleton_lifetime_is_shared_whatever_the_mode() {
    for mode in [
        InstanceContextMode::PerCall,
        InstanceContextMode::PerSession,
        InstanceContextMode::Single,
    ] {
        assert_eq!(
            sequence(ServiceLifetime::Singleton, mode, Binding::basic_http()).await,
            [1, 2, 3],
            "singleton with {mode}"
        );
    }
}

#[tokio::test]
async fn test_scoped_lifetime_is_hosted_as_single() {
    for mode in [InstanceContextMode::PerCall, InstanceContextMode::Single] {
        assert_eq!(
            sequence(ServiceLifetime::Scoped, mode, Binding::basic_http()).await,
            [1, 2, 3],
            "scoped with {mode}"
        );
    }
}

#[tokio::test]
async fn test_transient_per_call() {
    assert_eq!(
        sequence(
            ServiceLifetime::Transient,
            InstanceContextMode::PerCall,
            Binding::basic_http()
        )
        .await,
        [1, 1, 1]
    );
}

#[tokio::test]
async fn test_transient_per_session_without_sessions() {
    assert_eq!(
        sequence(
            ServiceLifetime::Transient,
            InstanceContextMode::PerSession,
            Binding::basic_http()
        )
        .await,
        [1, 1, 1]
    );
}

#[tokio::test]
async fn test_transient_per_session_with_sessions() {
    assert_eq!(
        sequence(
            ServiceLifetime::Transient,
            InstanceContextMode::PerSession,
            Binding::net_tcp()
        )
        .await,
        [1, 2, 1]
    );
}

#[tokio::test]
async fn test_transient_single() {
    assert_eq!(
        sequence(
            ServiceLifetime::Transient,
            InstanceContextMode::Single,
            Binding::basic_http()
        )
        .await,
        [1, 2, 3]
    );
}

#[tokio::test]
async fn test_session_ids() {
    let host = open(
        ServiceLifetime::Transient,
        InstanceContextMode::PerSession,
        Binding::net_tcp(),
    );
    let first = host.create_channel("visits").unwrap();
    let second = host.create_channel("visits").unwrap();
    assert!(first.session_id().is_some());
    assert_ne!(first.session_id(), second.session_id());

    let host = open(
        ServiceLifetime::Transient,
        InstanceContextMode::PerSession,
        Binding::basic_http(),
    );
    assert!(host.create_channel("visits").unwrap().session_id().is_none());
}
